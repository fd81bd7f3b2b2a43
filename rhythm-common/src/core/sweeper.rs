use super::{NoteId, NoteSet, Tolerances};

/// Retire every pending note, in any lane, whose outer window closed before
/// `elapsed_ms`. Returns how many notes were newly missed.
pub fn sweep(notes: &mut NoteSet, tolerances: &Tolerances, elapsed_ms: f64) -> usize {
    let min_time = tolerances.min_eligible_time(elapsed_ms);
    // Sorted by time, so expired notes form a prefix of the pending list
    let expired: Vec<NoteId> = notes
        .pending()
        .take_while(|(_, n)| n.ms < min_time)
        .map(|(id, _)| id)
        .collect();

    let count = expired
        .into_iter()
        .filter(|&id| notes.mark_missed(id, elapsed_ms))
        .count();
    if count > 0 {
        log::debug!("{count} note(s) missed at {elapsed_ms}ms");
    }
    count
}
