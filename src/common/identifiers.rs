//! Human-readable record identifiers.
//!
//! Field IDs look like `C-0042` and operation IDs like `OP-00001234`. The
//! generators alone give no uniqueness guarantee: with 10,000 possible field
//! IDs a collision becomes likely after roughly a hundred fields. The
//! allocators below therefore check each candidate against the store before
//! handing it out, and the primary key rejects anything that still races
//! through.

use crate::common::errors::{BusinessResult, DbErrorExt};
use rand::Rng;
use sea_orm::{ConnectionTrait, EntityTrait};

pub const FIELD_ID_PREFIX: &str = "C-";
pub const FIELD_ID_MAX: u32 = 9_999;
pub const OPERATION_ID_PREFIX: &str = "OP-";
pub const OPERATION_ID_MAX: u32 = 99_999_999;

pub fn gen_field_id() -> String {
    let number = rand::rng().random_range(0..=FIELD_ID_MAX);
    format!("{FIELD_ID_PREFIX}{number:04}")
}

pub fn gen_operation_id() -> String {
    let number = rand::rng().random_range(0..=OPERATION_ID_MAX);
    format!("{OPERATION_ID_PREFIX}{number:08}")
}

/// Draw field IDs until one is not yet taken
pub async fn allocate_field_id<C: ConnectionTrait>(db: &C, attempts: u32) -> BusinessResult<String> {
    allocate::<crate::fields::models::Entity, C>(db, attempts, gen_field_id, "field").await
}

/// Draw operation IDs until one is not yet taken
pub async fn allocate_operation_id<C: ConnectionTrait>(
    db: &C,
    attempts: u32,
) -> BusinessResult<String> {
    allocate::<crate::operations::models::Entity, C>(db, attempts, gen_operation_id, "operation")
        .await
}

async fn allocate<E, C>(
    db: &C,
    attempts: u32,
    generate: fn() -> String,
    resource: &str,
) -> BusinessResult<String>
where
    E: EntityTrait,
    <E::PrimaryKey as sea_orm::PrimaryKeyTrait>::ValueType: From<String>,
    C: ConnectionTrait,
{
    for _ in 0..attempts {
        let candidate = generate();
        let existing = E::find_by_id(candidate.clone())
            .one(db)
            .await
            .map_err(|e| e.to_business_error(resource))?;
        if existing.is_none() {
            return Ok(candidate);
        }
        tracing::warn!("Generated {resource} id {candidate} is already taken, drawing again");
    }

    tracing::error!("Could not allocate a free {resource} id after {attempts} attempts");
    Err(crate::duplicate_resource!(resource, "id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::BusinessError;
    use crate::config::test_helpers::setup_test_db;
    use std::collections::HashSet;

    const TRIALS: usize = 10_000;

    fn is_field_id(id: &str) -> bool {
        has_shape(id, FIELD_ID_PREFIX, 4)
    }

    fn is_operation_id(id: &str) -> bool {
        has_shape(id, OPERATION_ID_PREFIX, 8)
    }

    fn has_shape(id: &str, prefix: &str, digits: usize) -> bool {
        id.strip_prefix(prefix)
            .is_some_and(|rest| rest.len() == digits && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    #[test]
    fn test_field_ids_match_format_and_range() {
        for _ in 0..TRIALS {
            let id = gen_field_id();
            assert!(is_field_id(&id), "Unexpected field id {id}");
            let number: u32 = id[FIELD_ID_PREFIX.len()..].parse().unwrap();
            assert!(number <= FIELD_ID_MAX);
        }
    }

    #[test]
    fn test_operation_ids_match_format_and_range() {
        for _ in 0..TRIALS {
            let id = gen_operation_id();
            assert!(is_operation_id(&id), "Unexpected operation id {id}");
            let number: u32 = id[OPERATION_ID_PREFIX.len()..].parse().unwrap();
            assert!(number <= OPERATION_ID_MAX);
        }
    }

    #[test]
    fn test_field_id_space_collides() {
        // 10,000 draws from 10,000 values repeat with near certainty, which is
        // why allocation checks the store
        let distinct: HashSet<String> = (0..TRIALS).map(|_| gen_field_id()).collect();
        assert!(distinct.len() < TRIALS);
    }

    #[test]
    fn test_shape_checks() {
        assert!(is_field_id("C-0042"));
        assert!(!is_field_id("C-42"));
        assert!(!is_field_id("OP-00000042"));
        assert!(is_operation_id("OP-00000042"));
        assert!(!is_operation_id("OP-0000004x"));
    }

    #[tokio::test]
    async fn test_allocate_returns_unused_ids() {
        let db = setup_test_db().await;
        let field_id = allocate_field_id(&db, 4).await.unwrap();
        assert!(is_field_id(&field_id));
        let operation_id = allocate_operation_id(&db, 4).await.unwrap();
        assert!(is_operation_id(&operation_id));
    }

    #[tokio::test]
    async fn test_allocate_with_no_attempts_is_duplicate() {
        let db = setup_test_db().await;
        let result = allocate_field_id(&db, 0).await;
        assert!(matches!(result, Err(BusinessError::Duplicate { .. })));
    }
}
