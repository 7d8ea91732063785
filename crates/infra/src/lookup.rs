//! Resource lookup: fetch one entity by key, with absence as a normal outcome.
//!
//! `get_or_not_found` never turns a store fault into `NotFound` (or the other
//! way around). Callers get `Result<Lookup<E>, StoreError>` and must handle
//! all three cases.

use pollsite_core::Entity;

use crate::poll_store::{EntityStore, StoreResult};

/// Outcome of a key-based lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

/// Look up `id` in `store`.
///
/// - present → `Ok(Lookup::Found(entity))`
/// - absent → `Ok(Lookup::NotFound)`
/// - store fault → `Err(StoreError)`, propagated unchanged
pub async fn get_or_not_found<E, S>(store: &S, id: &E::Id) -> StoreResult<Lookup<E>>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    let found = store.find_by_id(id).await?;
    if found.is_none() {
        tracing::debug!(id = %id, entity = core::any::type_name::<E>(), "lookup found nothing");
    }
    Ok(found.into())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use pollsite_core::RecordId;
    use pollsite_polls::{NewQuestion, Question, QuestionId};

    use super::*;
    use crate::poll_store::{InMemoryPollStore, PollStore, StoreError};

    /// Store whose backend is unreachable.
    struct UnreachableStore;

    #[async_trait]
    impl EntityStore<Question> for UnreachableStore {
        async fn find_by_id(&self, _id: &QuestionId) -> StoreResult<Option<Question>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn qid(n: i64) -> QuestionId {
        QuestionId::new(RecordId::new(n).unwrap())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn block_on<F: core::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[tokio::test]
    async fn found_when_present() {
        let store = InMemoryPollStore::new();
        store
            .insert_question(NewQuestion::new("What's going on?", t0()).unwrap())
            .await
            .unwrap();
        let mut q2 = store
            .insert_question(NewQuestion::new("placeholder", t0()).unwrap())
            .await
            .unwrap();
        q2.set_question_text("Are there anything else?").unwrap();
        store.update_question(&q2).await.unwrap();

        let outcome: Lookup<Question> = get_or_not_found(&store, &qid(2)).await.unwrap();

        let expected = Question::from_parts(qid(2), "Are there anything else?", t0()).unwrap();
        assert_eq!(outcome, Lookup::Found(expected));
    }

    #[tokio::test]
    async fn not_found_on_empty_store() {
        let store = InMemoryPollStore::new();
        let outcome: Lookup<Question> = get_or_not_found(&store, &qid(2)).await.unwrap();
        assert_eq!(outcome, Lookup::NotFound);
    }

    #[tokio::test]
    async fn store_fault_is_not_not_found() {
        let outcome: StoreResult<Lookup<Question>> =
            get_or_not_found(&UnreachableStore, &qid(2)).await;

        match outcome {
            Err(e) => assert!(e.is_unavailable()),
            Ok(other) => panic!("expected store fault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn works_through_trait_objects() {
        let store: std::sync::Arc<dyn PollStore> = std::sync::Arc::new(InMemoryPollStore::new());
        store
            .insert_question(NewQuestion::new("q", t0()).unwrap())
            .await
            .unwrap();

        let outcome: Lookup<Question> = get_or_not_found(store.as_ref(), &qid(1)).await.unwrap();
        assert!(outcome.is_found());
    }

    #[test]
    fn lookup_from_option() {
        let found: Lookup<i32> = Some(3).into();
        assert_eq!(found, Lookup::Found(3));
        assert!(found.is_found());

        let missing: Lookup<i32> = None.into();
        assert!(!missing.is_found());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: stored ids are found field-for-field, unknown ids are
        /// NotFound, and repeating a lookup does not change its outcome.
        #[test]
        fn lookup_matches_store_contents(
            texts in prop::collection::vec("[A-Za-z][A-Za-z0-9 ?]{0,40}", 0..12),
            probe in 1i64..30,
        ) {
            block_on(async {
                let store = InMemoryPollStore::new();
                let mut inserted = Vec::new();
                for text in &texts {
                    let q = store
                        .insert_question(NewQuestion::new(text.clone(), t0()).unwrap())
                        .await
                        .unwrap();
                    inserted.push(q);
                }

                for q in &inserted {
                    let outcome: Lookup<Question> =
                        get_or_not_found(&store, &q.id_typed()).await.unwrap();
                    prop_assert_eq!(outcome, Lookup::Found(q.clone()));
                }

                let first: Lookup<Question> = get_or_not_found(&store, &qid(probe)).await.unwrap();
                let second: Lookup<Question> = get_or_not_found(&store, &qid(probe)).await.unwrap();
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(first.is_found(), (probe as usize) <= texts.len());
                Ok(())
            })?;
        }
    }
}
