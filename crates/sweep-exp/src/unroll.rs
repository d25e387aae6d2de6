use sweep_core::JobRecord;

/// Formats the per-repetition log directory name.
pub fn rep_dir_name(rep: u32) -> String {
    format!("rep_{:02}", rep)
}

/// Unrolls every record into one record per repetition.
///
/// Records already carrying a repetition index pass through unchanged, so the
/// pass is idempotent. Output is grouped by source record with ascending
/// repetition indices.
pub fn unroll_repetitions(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut unrolled = Vec::new();
    for record in records {
        if record.rep_idx.is_some() {
            unrolled.push(record);
            continue;
        }
        for rep in 0..record.repetitions {
            let mut copy = record.clone();
            copy.rep_idx = Some(rep);
            copy.rep_log_path = Some(record.log_path.join(rep_dir_name(rep)));
            unrolled.push(copy);
        }
    }
    unrolled
}
