use crate::gateway::BackendGateway;
use crate::models::{NewTrait, Trait, TraitsView};
use crate::notify::{Notification, Notifier};
use std::sync::Arc;
use tracing::error;

const FETCH_FAILED: &str =
    "Something went wrong while fetching your traits. Please try reloading the page.";
const ADD_SUCCEEDED: &str = "Trait added successfully";
const ADD_FAILED: &str = "Something went wrong while adding your trait";

pub struct TraitStore {
    backend: Arc<dyn BackendGateway>,
    notifier: Notifier,
    traits: Vec<Trait>,
    fetching: bool,
    adding: bool,
}

impl TraitStore {
    pub fn new(backend: Arc<dyn BackendGateway>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            traits: Vec::new(),
            fetching: false,
            adding: false,
        }
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn snapshot(&self) -> TraitsView {
        TraitsView {
            traits: self.traits.clone(),
            fetching: self.fetching,
            adding: self.adding,
        }
    }

    pub async fn fetch(&mut self) {
        self.fetching = true;
        match self.backend.list_traits().await {
            Ok(traits) => self.traits = traits,
            Err(err) => {
                error!("failed to fetch traits: {err}");
                self.notifier.push(Notification::danger(FETCH_FAILED, &err));
            }
        }
        self.fetching = false;
    }

    pub async fn add(&mut self, insert: NewTrait) {
        self.adding = true;
        match self.backend.create_trait(&insert).await {
            Ok(created) => {
                self.traits.push(created);
                self.notifier.push(Notification::success(ADD_SUCCEEDED));
            }
            Err(err) => {
                error!("failed to add trait {:?}: {err}", insert.name);
                self.notifier.push(Notification::danger(ADD_FAILED, &err));
            }
        }
        self.adding = false;
    }

    pub fn clear(&mut self) {
        self.traits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::FakeBackend;
    use crate::notify::Severity;
    use std::sync::atomic::Ordering;

    fn seeded_trait(id: i64, name: &str, color: &str) -> Trait {
        Trait {
            id,
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    fn store(fake: &Arc<FakeBackend>) -> (TraitStore, Notifier) {
        let notifier = Notifier::new();
        let store = TraitStore::new(
            Arc::clone(fake) as Arc<dyn BackendGateway>,
            notifier.clone(),
        );
        (store, notifier)
    }

    #[tokio::test]
    async fn fetch_replaces_the_collection() {
        let fake =
            Arc::new(FakeBackend::new().with_traits(vec![seeded_trait(9, "Good", "#2AF004")]));
        let (mut traits, _notifier) = store(&fake);

        traits.fetch().await;

        assert_eq!(traits.traits().len(), 1);
        assert_eq!(traits.traits()[0].color, "#2AF004");
    }

    #[tokio::test]
    async fn fetch_failure_keeps_the_last_good_collection() {
        let fake =
            Arc::new(FakeBackend::new().with_traits(vec![seeded_trait(9, "Good", "#2AF004")]));
        let (mut traits, notifier) = store(&fake);
        traits.fetch().await;
        fake.fail_lists.store(true, Ordering::SeqCst);

        traits.fetch().await;

        assert_eq!(traits.traits().len(), 1);
        let notifications = notifier.drain();
        assert_eq!(notifications[0].message, FETCH_FAILED);
        assert_eq!(notifications[0].severity, Severity::Danger);
    }

    #[tokio::test]
    async fn add_appends_and_reports_success() {
        let fake = Arc::new(FakeBackend::new());
        let (mut traits, notifier) = store(&fake);

        traits
            .add(NewTrait {
                name: "Bad".to_string(),
                color: "#F6F6F6".to_string(),
            })
            .await;

        assert_eq!(traits.traits().len(), 1);
        assert!(!traits.snapshot().adding);
        let notifications = notifier.drain();
        assert_eq!(notifications[0].message, ADD_SUCCEEDED);
        assert_eq!(notifications[0].severity, Severity::Success);
        assert_eq!(notifications[0].dismiss_text.as_deref(), Some("Done"));
    }

    #[tokio::test]
    async fn add_failure_leaves_the_collection_untouched() {
        let fake = Arc::new(FakeBackend::new());
        let (mut traits, notifier) = store(&fake);
        fake.fail_creates.store(true, Ordering::SeqCst);

        traits
            .add(NewTrait {
                name: "Bad".to_string(),
                color: "#F6F6F6".to_string(),
            })
            .await;

        assert!(traits.traits().is_empty());
        assert_eq!(notifier.drain()[0].message, ADD_FAILED);
    }

    #[tokio::test]
    async fn clear_empties_the_collection() {
        let fake =
            Arc::new(FakeBackend::new().with_traits(vec![seeded_trait(9, "Good", "#2AF004")]));
        let (mut traits, _notifier) = store(&fake);
        traits.fetch().await;

        traits.clear();

        assert!(traits.traits().is_empty());
    }
}
