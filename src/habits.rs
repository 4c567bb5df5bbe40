use crate::gateway::BackendGateway;
use crate::models::{Habit, HabitsView, NewHabit};
use crate::notify::{Notification, Notifier};
use std::sync::Arc;
use tracing::error;

const FETCH_FAILED: &str =
    "Something went wrong while fetching your habits. Please try reloading the page.";
const ADD_SUCCEEDED: &str = "Habit added successfully";
const ADD_FAILED: &str = "Something went wrong while adding your habit";
const REMOVE_SUCCEEDED: &str = "Your habit has been deleted.";
const REMOVE_FAILED: &str = "Something went wrong while deleting your habit. Please try again.";

pub struct HabitStore {
    backend: Arc<dyn BackendGateway>,
    notifier: Notifier,
    habits: Vec<Habit>,
    fetching: bool,
    adding: bool,
    removing: Option<i64>,
}

impl HabitStore {
    pub fn new(backend: Arc<dyn BackendGateway>, notifier: Notifier) -> Self {
        Self {
            backend,
            notifier,
            habits: Vec::new(),
            fetching: false,
            adding: false,
            removing: None,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn snapshot(&self) -> HabitsView {
        HabitsView {
            habits: self.habits.clone(),
            fetching: self.fetching,
            adding: self.adding,
            removing: self.removing,
        }
    }

    pub async fn fetch(&mut self) {
        self.fetching = true;
        match self.backend.list_habits().await {
            Ok(habits) => self.habits = habits,
            Err(err) => {
                error!("failed to fetch habits: {err}");
                self.notifier.push(Notification::danger(FETCH_FAILED, &err));
            }
        }
        self.fetching = false;
    }

    pub async fn add(&mut self, insert: NewHabit) {
        self.adding = true;
        match self.backend.create_habit(&insert).await {
            Ok(created) => {
                self.habits.push(created);
                self.notifier.push(Notification::success(ADD_SUCCEEDED));
            }
            Err(err) => {
                error!("failed to add habit {:?}: {err}", insert.name);
                self.notifier.push(Notification::danger(ADD_FAILED, &err));
            }
        }
        self.adding = false;
    }

    /// Deletes the habit at the backend. Reports whether the delete went
    /// through so the caller can cascade local occurrence cleanup.
    pub async fn remove(&mut self, id: i64) -> bool {
        self.removing = Some(id);
        let removed = match self.backend.destroy_habit(id).await {
            Ok(()) => {
                self.habits.retain(|habit| habit.id != id);
                self.notifier.push(Notification::neutral(REMOVE_SUCCEEDED));
                true
            }
            Err(err) => {
                error!("failed to delete habit {id}: {err}");
                self.notifier.push(Notification::danger(REMOVE_FAILED, &err));
                false
            }
        };
        self.removing = None;
        removed
    }

    pub fn clear(&mut self) {
        self.habits.clear();
    }
}
