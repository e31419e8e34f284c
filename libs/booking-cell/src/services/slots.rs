use std::collections::HashSet;

use shared_config::ScheduleConfig;

/// Builds the fixed candidate grid for a clinic day: "HH:MM" strings at
/// `step_minutes` intervals within each hour from `open_hour` (inclusive) to
/// `close_hour` (exclusive), zero-padded. Pure and deterministic.
pub fn generate_slots(open_hour: u32, close_hour: u32, step_minutes: u32) -> Vec<String> {
    let mut slots = Vec::new();
    if step_minutes == 0 {
        return slots;
    }

    for hour in open_hour..close_hour {
        let mut minute = 0;
        while minute < 60 {
            slots.push(format!("{:02}:{:02}", hour, minute));
            minute += step_minutes;
        }
    }

    slots
}

pub fn grid_for(schedule: &ScheduleConfig) -> Vec<String> {
    generate_slots(schedule.open_hour, schedule.close_hour, schedule.slot_minutes)
}

/// Ordered set difference: the grid minus the booked times, preserving grid
/// order.
pub fn subtract(grid: &[String], booked: &HashSet<String>) -> Vec<String> {
    grid.iter()
        .filter(|slot| !booked.contains(slot.as_str()))
        .cloned()
        .collect()
}
