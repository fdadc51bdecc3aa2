/// Last stage the restoration script announces.
pub const FINAL_STAGE: u8 = 4;

/// Recognizes the script's `Running Stage N` banners.
pub fn stage_from_line(line: &str) -> Option<u8> {
    (1..=FINAL_STAGE).find(|stage| line.contains(&format!("Running Stage {stage}")))
}
