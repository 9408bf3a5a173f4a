use thiserror::Error;

/// Failure while applying a deferred gameplay effect.
///
/// These never reach the physics step; the event queue logs them and moves on.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    /// The entity was despawned after the event was queued.
    #[error("The entity {0:?} no longer exists")]
    StaleEntity(hecs::Entity),
    /// The entity exists but lacks a component the effect needs.
    #[error("The entity {entity:?} has no `{component}` component")]
    MissingComponent {
        entity: hecs::Entity,
        component: &'static str,
    },
    /// No player body has been registered with the classifier.
    #[error("No player body is registered")]
    NoPlayerBody,
}

impl ContactError {
    /// Translate a hecs lookup failure for `component` on `entity`.
    pub fn lookup(entity: hecs::Entity, component: &'static str, err: hecs::ComponentError) -> Self {
        match err {
            hecs::ComponentError::NoSuchEntity => Self::StaleEntity(entity),
            hecs::ComponentError::MissingComponent(_) => Self::MissingComponent { entity, component },
        }
    }
}
