//! Service trait and lifecycle management.
//!
//! Long-lived components implement `Service` so the registry can start them
//! in order, stop them in reverse, and report their health.

use vh_core::error::VhResult;

/// Lifecycle state of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Service has been created but not initialized.
    Created,
    /// Service is running and ready.
    Running,
    /// Service has been stopped.
    Stopped,
    /// Service encountered a fatal error.
    Failed,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Trait implemented by the store and the query cache.
///
/// Services are shared behind `Arc`, so lifecycle methods take `&self` and
/// keep their state behind interior mutability.
pub trait Service: Send + Sync {
    /// Human-readable name of this service.
    fn name(&self) -> &str;

    /// Current state of this service.
    fn state(&self) -> ServiceState;

    /// Initialize the service. Must be safe to call more than once.
    fn init(&self) -> VhResult<()>;

    /// Shut the service down.
    fn shutdown(&self) -> VhResult<()>;

    /// Health check. Returns true if the service is operational.
    fn is_healthy(&self) -> bool {
        self.state() == ServiceState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct TestService {
        state: Mutex<ServiceState>,
    }

    impl Service for TestService {
        fn name(&self) -> &str {
            "test"
        }

        fn state(&self) -> ServiceState {
            *self.state.lock().unwrap()
        }

        fn init(&self) -> VhResult<()> {
            *self.state.lock().unwrap() = ServiceState::Running;
            Ok(())
        }

        fn shutdown(&self) -> VhResult<()> {
            *self.state.lock().unwrap() = ServiceState::Stopped;
            Ok(())
        }
    }

    #[test]
    fn test_service_lifecycle() {
        let svc = TestService {
            state: Mutex::new(ServiceState::Created),
        };
        assert!(!svc.is_healthy());
        svc.init().unwrap();
        assert!(svc.is_healthy());
        svc.shutdown().unwrap();
        assert!(!svc.is_healthy());
        assert_eq!(svc.state().to_string(), "stopped");
    }
}
