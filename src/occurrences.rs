use crate::cache::RangeCache;
use crate::gateway::BackendGateway;
use crate::models::{
    CalendarSnapshot, DayGroup, NewOccurrence, Occurrence, OccurrenceFilter, TimeRange,
};
use crate::notify::{Notification, Notifier};
use std::sync::Arc;
use tracing::error;

const FETCH_FAILED: &str =
    "Something went wrong while fetching your habit entries. Please try reloading the page.";
const ADD_SUCCEEDED: &str = "Habit entry(s) are added to the calendar";
const ADD_FAILED: &str =
    "Something went wrong while adding your habit entry. Please try again.";
const REMOVE_SUCCEEDED: &str = "Your habit entry has been deleted from the calendar.";
const REMOVE_FAILED: &str =
    "Something went wrong while deleting your habit entry. Please try again.";

/// Source of truth for the occurrences of the active calendar window.
///
/// Every mutation ends with an explicit recomputation of the derived views
/// (filtered list and day grouping), so readers always observe a consistent
/// trio of raw collection, filter, and derivation.
pub struct OccurrenceStore {
    backend: Arc<dyn BackendGateway>,
    notifier: Notifier,
    range: TimeRange,
    fetching: bool,
    adding: bool,
    all_occurrences: Vec<Occurrence>,
    occurrences: Vec<Occurrence>,
    by_date: Vec<DayGroup>,
    filtered_by: OccurrenceFilter,
    cache: RangeCache,
}

impl OccurrenceStore {
    pub fn new(
        backend: Arc<dyn BackendGateway>,
        notifier: Notifier,
        filtered_by: OccurrenceFilter,
    ) -> Self {
        Self {
            backend,
            notifier,
            range: TimeRange::default(),
            fetching: false,
            adding: false,
            all_occurrences: Vec::new(),
            occurrences: Vec::new(),
            by_date: Vec::new(),
            filtered_by,
            cache: RangeCache::new(),
        }
    }

    /// Makes `range` the active window and loads its records. A window with a
    /// zero bound is not initialized yet and is skipped. An exact cache hit
    /// replaces the collection without touching the network; on a miss the
    /// fetched records are cached and installed. A failed fetch keeps the
    /// last-good collection on screen.
    pub async fn fetch(&mut self, range: TimeRange) {
        self.range = range;
        if !range.is_set() {
            return;
        }

        if let Some(cached) = self.cache.get(range) {
            self.all_occurrences = cached.to_vec();
            self.recompute();
            return;
        }

        self.fetching = true;
        match self.backend.list_occurrences(range).await {
            Ok(records) => {
                self.cache.put(range, records.clone());
                self.all_occurrences = records;
                self.recompute();
            }
            Err(err) => {
                error!(
                    "failed to fetch occurrences for {}..{}: {err}",
                    range.start, range.end
                );
                self.notifier.push(Notification::danger(FETCH_FAILED, &err));
            }
        }
        self.fetching = false;
    }

    pub async fn add(&mut self, insert: NewOccurrence) {
        self.adding = true;
        match self.backend.create_occurrence(&insert).await {
            Ok(created) => {
                self.cache.insert(self.range, created.clone());
                self.all_occurrences.push(created);
                self.recompute();
                self.notifier.push(Notification::success(ADD_SUCCEEDED));
            }
            Err(err) => {
                error!("failed to add occurrence for habit {}: {err}", insert.habit_id);
                self.notifier.push(Notification::danger(ADD_FAILED, &err));
            }
        }
        self.adding = false;
    }

    pub async fn remove(&mut self, id: i64) {
        match self.backend.destroy_occurrence(id).await {
            Ok(()) => {
                self.all_occurrences.retain(|occurrence| occurrence.id != id);
                self.cache.remove(self.range, id);
                self.recompute();
                self.notifier.push(Notification::neutral(REMOVE_SUCCEEDED));
            }
            Err(err) => {
                error!("failed to delete occurrence {id}: {err}");
                self.notifier.push(Notification::danger(REMOVE_FAILED, &err));
            }
        }
    }

    /// Local bulk removal for a habit that was already deleted at the
    /// backend. No network call is made here.
    pub fn remove_by_habit(&mut self, habit_id: i64) {
        let (dropped, kept): (Vec<Occurrence>, Vec<Occurrence>) =
            std::mem::take(&mut self.all_occurrences)
                .into_iter()
                .partition(|occurrence| occurrence.habit_id == habit_id);

        self.all_occurrences = kept;
        for occurrence in dropped {
            self.cache.remove(self.range, occurrence.id);
        }
        self.recompute();
    }

    pub fn clear(&mut self) {
        self.all_occurrences.clear();
        self.cache.clear();
        self.recompute();
    }

    pub fn filter_by(&mut self, filtered_by: OccurrenceFilter) {
        self.filtered_by = filtered_by;
        self.recompute();
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        let mut habit_ids: Vec<i64> = self.filtered_by.habit_ids.iter().copied().collect();
        habit_ids.sort_unstable();
        let mut trait_ids: Vec<i64> = self.filtered_by.trait_ids.iter().copied().collect();
        trait_ids.sort_unstable();

        CalendarSnapshot {
            range: self.range,
            fetching: self.fetching,
            adding: self.adding,
            occurrences: self.occurrences.clone(),
            occurrences_by_date: self.by_date.clone(),
            habit_ids,
            trait_ids,
        }
    }

    fn recompute(&mut self) {
        self.occurrences = filter_occurrences(&self.all_occurrences, &self.filtered_by);
        self.by_date = group_by_day(&self.occurrences);
    }
}

fn filter_occurrences(all: &[Occurrence], filter: &OccurrenceFilter) -> Vec<Occurrence> {
    all.iter()
        .filter(|occurrence| {
            // A record with no denormalized trait reference can never match.
            let trait_matches = occurrence
                .habit
                .as_ref()
                .and_then(|habit| habit.trait_.as_ref())
                .is_some_and(|t| filter.trait_ids.contains(&t.id));

            filter.habit_ids.contains(&occurrence.habit_id) && trait_matches
        })
        .cloned()
        .collect()
}

fn group_by_day(occurrences: &[Occurrence]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for occurrence in occurrences {
        match groups.iter_mut().find(|group| group.day == occurrence.day) {
            Some(group) => group.occurrences.push(occurrence.clone()),
            None => groups.push(DayGroup {
                day: occurrence.day.clone(),
                occurrences: vec![occurrence.clone()],
            }),
        }
    }
    groups
}
