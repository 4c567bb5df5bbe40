use crate::gateway::BackendGateway;
use crate::habits::HabitStore;
use crate::models::OccurrenceFilter;
use crate::notify::Notifier;
use crate::occurrences::OccurrenceStore;
use crate::traits::TraitStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Session {
    pub habits: HabitStore,
    pub traits: TraitStore,
    pub occurrences: OccurrenceStore,
}

#[derive(Clone)]
pub struct AppState {
    pub notifier: Notifier,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    /// Builds the stores in dependency order: habits and traits are fetched
    /// first so the occurrence filter can start out including every known
    /// habit and trait id. Fetch failures surface as notifications and leave
    /// the corresponding collection (and therefore the filter) empty.
    pub async fn bootstrap(backend: Arc<dyn BackendGateway>) -> Self {
        let notifier = Notifier::new();

        let mut habits = HabitStore::new(Arc::clone(&backend), notifier.clone());
        let mut traits = TraitStore::new(Arc::clone(&backend), notifier.clone());
        habits.fetch().await;
        traits.fetch().await;

        let filtered_by = OccurrenceFilter {
            habit_ids: habits.habits().iter().map(|habit| habit.id).collect(),
            trait_ids: traits.traits().iter().map(|t| t.id).collect(),
        };
        let occurrences = OccurrenceStore::new(backend, notifier.clone(), filtered_by);

        Self {
            notifier,
            session: Arc::new(Mutex::new(Session {
                habits,
                traits,
                occurrences,
            })),
        }
    }
}
