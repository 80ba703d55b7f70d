// src/store/seed.rs — Deterministic demo data for a local call store

use chrono::{Duration, NaiveTime};

use crate::catalog::CampaignTable;
use crate::infra::config::Config;
use crate::store::store::{CallRecord, Store};

const FIRST_SLOT: (u32, u32) = (8, 0);
const SLOTS_PER_DAY: u32 = 24;
const SLOT_MINUTES: i64 = 30;
const DEMO_AGENTS: &[&str] = &["4245", "6873", "10009", "11757", "12584", "90088", "70001"];
const UNMAPPED_DNIS: &str = "5550000000";

/// Cheap integer mix so the same inputs always produce the same calls.
fn mix(a: u64, b: u64, c: u64) -> u64 {
    let mut x = a
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(b.wrapping_mul(0xC2B2_AE3D_27D4_EB4F))
        .wrapping_add(c.wrapping_mul(0x1656_67B1_9E37_79F9));
    x ^= x >> 29;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 32;
    x
}

fn slot_label(slot: u32) -> String {
    let start = NaiveTime::from_hms_opt(FIRST_SLOT.0, FIRST_SLOT.1, 0).unwrap_or_default();
    let from = start + Duration::minutes(SLOT_MINUTES * i64::from(slot));
    let to = from + Duration::minutes(SLOT_MINUTES);
    format!("{}-{}", from.format("%H:%M"), to.format("%H:%M"))
}

/// Insert demo calls covering the configured report window. Returns the count.
pub fn seed_demo(store: &Store, config: &Config) -> anyhow::Result<usize> {
    let table = CampaignTable::from_config(&config.campaigns);
    let mut numbers: Vec<String> = table.entries().iter().map(|(d, _)| d.clone()).collect();
    numbers.push(UNMAPPED_DNIS.to_string());

    let mut inserted = 0usize;
    let mut day = config.report.date_from;
    let mut day_index = 0u64;

    let tx = store.conn().unchecked_transaction()?;
    while day <= config.report.date_to {
        for slot in 0..SLOTS_PER_DAY {
            for (n, dnis) in numbers.iter().enumerate() {
                let calls = mix(day_index, u64::from(slot), n as u64) % 4;
                for k in 0..calls {
                    let r = mix(day_index * 31 + k, u64::from(slot) * 7 + 3, n as u64 + 11);
                    let abandoned = r % 9 == 0;
                    let call = CallRecord {
                        call_date: format!("{day} {}:00", slot_label(slot).get(..5).unwrap_or("08:00")),
                        interval_label: slot_label(slot),
                        direction: if r % 23 == 0 {
                            "OUTBOUND".to_string()
                        } else {
                            config.report.direction.clone()
                        },
                        abandoned,
                        hours_flag: if slot + 1 == SLOTS_PER_DAY {
                            "Outside".to_string()
                        } else {
                            config.report.in_hours_value.clone()
                        },
                        sub_category: (r % 37 == 0).then(|| "Test Call".to_string()),
                        source_campaign: Some(table.classify(dnis).to_string()),
                        dnis: dnis.clone(),
                        queue_secs: Some((r % 41) as i64),
                        ring_secs: Some((r % 6) as i64),
                        talk_secs: (!abandoned).then_some(60 + (r % 340) as i64),
                        wrapup_secs: (!abandoned).then_some(10 + (r % 50) as i64),
                        ivr_secs: Some(if r % 19 == 0 { 0 } else { 5 + (r % 25) as i64 }),
                        last_agent: (!abandoned)
                            .then(|| DEMO_AGENTS[(r % DEMO_AGENTS.len() as u64) as usize].to_string()),
                    };
                    store.insert_call(&call)?;
                    inserted += 1;
                }
            }
        }
        day += Duration::days(1);
        day_index += 1;
    }
    tx.commit()?;

    tracing::info!("Seeded {inserted} demo calls");
    Ok(inserted)
}
