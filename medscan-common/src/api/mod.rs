//! Wire types shared between the concept-linking service and its clients

pub mod types;

pub use types::{
    ExtractEntitiesRequest, ExtractEntitiesResponse, LinkedConcept, ReadinessResponse,
    RecognizedEntity,
};
