use crate::models::{Habit, NewHabit, NewOccurrence, NewTrait, Occurrence, TimeRange, Trait};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("invalid response body from {url}: {detail}")]
    Body { url: String, detail: String },
}

/// Thin async wrapper over the hosted persistence service. Implementations
/// perform one network call per method, with no retries and no timeouts.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn list_occurrences(&self, range: TimeRange) -> Result<Vec<Occurrence>, GatewayError>;
    async fn create_occurrence(&self, insert: &NewOccurrence) -> Result<Occurrence, GatewayError>;
    async fn destroy_occurrence(&self, id: i64) -> Result<(), GatewayError>;
    async fn list_habits(&self) -> Result<Vec<Habit>, GatewayError>;
    async fn create_habit(&self, insert: &NewHabit) -> Result<Habit, GatewayError>;
    async fn destroy_habit(&self, id: i64) -> Result<(), GatewayError>;
    async fn list_traits(&self) -> Result<Vec<Trait>, GatewayError>;
    async fn create_trait(&self, insert: &NewTrait) -> Result<Trait, GatewayError>;
}

pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(|source| GatewayError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, GatewayError> {
        response.json::<T>().await.map_err(|err| GatewayError::Body {
            url: url.to_string(),
            detail: err.to_string(),
        })
    }
}

#[async_trait]
impl BackendGateway for RestBackend {
    async fn list_occurrences(&self, range: TimeRange) -> Result<Vec<Occurrence>, GatewayError> {
        let url = self.endpoint("/occurrences");
        let request = self
            .client
            .get(&url)
            .query(&[("start", range.start), ("end", range.end)]);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }

    async fn create_occurrence(&self, insert: &NewOccurrence) -> Result<Occurrence, GatewayError> {
        let url = self.endpoint("/occurrences");
        let request = self.client.post(&url).json(insert);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }

    async fn destroy_occurrence(&self, id: i64) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/occurrences/{id}"));
        let request = self.client.delete(&url);
        self.send(self.authorize(request), &url).await?;
        Ok(())
    }

    async fn list_habits(&self) -> Result<Vec<Habit>, GatewayError> {
        let url = self.endpoint("/habits");
        let request = self.client.get(&url);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }

    async fn create_habit(&self, insert: &NewHabit) -> Result<Habit, GatewayError> {
        let url = self.endpoint("/habits");
        let request = self.client.post(&url).json(insert);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }

    async fn destroy_habit(&self, id: i64) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("/habits/{id}"));
        let request = self.client.delete(&url);
        self.send(self.authorize(request), &url).await?;
        Ok(())
    }

    async fn list_traits(&self) -> Result<Vec<Trait>, GatewayError> {
        let url = self.endpoint("/traits");
        let request = self.client.get(&url);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }

    async fn create_trait(&self, insert: &NewTrait) -> Result<Trait, GatewayError> {
        let url = self.endpoint("/traits");
        let request = self.client.post(&url).json(insert);
        let response = self.send(self.authorize(request), &url).await?;
        Self::decode(response, &url).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::models::{day_key, OccurrenceHabit, OccurrenceTrait};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory gateway double. Created records are hydrated the way the
    /// hosted service hydrates them: allocated id, derived day key, and a
    /// denormalized habit/trait reference looked up from the seeded habits.
    #[derive(Default)]
    pub struct FakeBackend {
        occurrences: Mutex<Vec<Occurrence>>,
        habits: Mutex<Vec<Habit>>,
        traits: Mutex<Vec<Trait>>,
        list_calls: AtomicUsize,
        destroy_calls: AtomicUsize,
        pub fail_lists: AtomicBool,
        pub fail_creates: AtomicBool,
        pub fail_destroys: AtomicBool,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_occurrences(self, records: Vec<Occurrence>) -> Self {
            *self.occurrences.lock().unwrap() = records;
            self
        }

        pub fn with_habits(self, habits: Vec<Habit>) -> Self {
            *self.habits.lock().unwrap() = habits;
            self
        }

        pub fn with_traits(self, traits: Vec<Trait>) -> Self {
            *self.traits.lock().unwrap() = traits;
            self
        }

        pub fn list_call_count(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub fn destroy_call_count(&self) -> usize {
            self.destroy_calls.load(Ordering::SeqCst)
        }

        fn failure(path: &str) -> GatewayError {
            GatewayError::Status {
                status: 500,
                url: format!("fake://{path}"),
            }
        }

        fn next_id(records: &[i64]) -> i64 {
            records.iter().copied().max().unwrap_or(0) + 1
        }
    }

    #[async_trait]
    impl BackendGateway for FakeBackend {
        async fn list_occurrences(
            &self,
            range: TimeRange,
        ) -> Result<Vec<Occurrence>, GatewayError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Self::failure("/occurrences"));
            }

            let occurrences = self.occurrences.lock().unwrap();
            Ok(occurrences
                .iter()
                .filter(|occurrence| range.contains(occurrence.timestamp))
                .cloned()
                .collect())
        }

        async fn create_occurrence(
            &self,
            insert: &NewOccurrence,
        ) -> Result<Occurrence, GatewayError> {
            if self.fail_creates.load(Ordering::SeqCst) {
                return Err(Self::failure("/occurrences"));
            }

            let habit = self
                .habits
                .lock()
                .unwrap()
                .iter()
                .find(|habit| habit.id == insert.habit_id)
                .map(|habit| OccurrenceHabit {
                    name: habit.name.clone(),
                    trait_: Some(OccurrenceTrait { id: habit.trait_id }),
                });

            let mut occurrences = self.occurrences.lock().unwrap();
            let ids: Vec<i64> = occurrences.iter().map(|occurrence| occurrence.id).collect();
            let created = Occurrence {
                id: Self::next_id(&ids),
                habit_id: insert.habit_id,
                timestamp: insert.timestamp,
                day: insert
                    .day
                    .clone()
                    .or_else(|| day_key(insert.timestamp))
                    .unwrap_or_default(),
                habit,
            };
            occurrences.push(created.clone());
            Ok(created)
        }

        async fn destroy_occurrence(&self, id: i64) -> Result<(), GatewayError> {
            self.destroy_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_destroys.load(Ordering::SeqCst) {
                return Err(Self::failure("/occurrences"));
            }

            self.occurrences
                .lock()
                .unwrap()
                .retain(|occurrence| occurrence.id != id);
            Ok(())
        }

        async fn list_habits(&self) -> Result<Vec<Habit>, GatewayError> {
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Self::failure("/habits"));
            }
            Ok(self.habits.lock().unwrap().clone())
        }

        async fn create_habit(&self, insert: &NewHabit) -> Result<Habit, GatewayError> {
            if self.fail_creates.load(Ordering::SeqCst) {
                return Err(Self::failure("/habits"));
            }

            let mut habits = self.habits.lock().unwrap();
            let ids: Vec<i64> = habits.iter().map(|habit| habit.id).collect();
            let created = Habit {
                id: Self::next_id(&ids),
                name: insert.name.clone(),
                description: insert.description.clone(),
                trait_id: insert.trait_id,
                trait_: self
                    .traits
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|t| t.id == insert.trait_id)
                    .cloned(),
                created_at: None,
            };
            habits.push(created.clone());
            Ok(created)
        }

        async fn destroy_habit(&self, id: i64) -> Result<(), GatewayError> {
            self.destroy_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_destroys.load(Ordering::SeqCst) {
                return Err(Self::failure("/habits"));
            }

            self.habits.lock().unwrap().retain(|habit| habit.id != id);
            Ok(())
        }

        async fn list_traits(&self) -> Result<Vec<Trait>, GatewayError> {
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(Self::failure("/traits"));
            }
            Ok(self.traits.lock().unwrap().clone())
        }

        async fn create_trait(&self, insert: &NewTrait) -> Result<Trait, GatewayError> {
            if self.fail_creates.load(Ordering::SeqCst) {
                return Err(Self::failure("/traits"));
            }

            let mut traits = self.traits.lock().unwrap();
            let ids: Vec<i64> = traits.iter().map(|t| t.id).collect();
            let created = Trait {
                id: Self::next_id(&ids),
                name: insert.name.clone(),
                color: insert.color.clone(),
            };
            traits.push(created.clone());
            Ok(created)
        }
    }
}
