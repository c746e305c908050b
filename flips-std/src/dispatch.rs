//! # Dispatch rule
//!
//! [`FlipDispatcher`] decides, per call, which implementation runs:
//!
//! 1. Look up the binding for the call's declaring type. No binding is a
//!    configuration fault and fails the call immediately.
//! 2. A self-binding proceeds with the original receiver. The registry is
//!    not touched.
//! 3. Otherwise the alternate is resolved from the registry, viewed through
//!    the call's capability, and the operation runs on it.
//!
//! Failures from the implementation that ran are classified: the disabled
//! signal passes through as is, anything else from the alternate is wrapped
//! with its cause kept. Nothing is cached between calls; the alternate is
//! resolved again every time.

use crate::{bindings::FlipBindings, container::Container};
use flips_core::{
    BoxError, Call, ComponentKey, ComponentRegistry, FeatureNotEnabled, FlipError, Route,
};
use std::sync::Arc;

/// Routes calls between source and alternate implementations.
///
/// Holds an immutable binding table and a shared registry handle, so it is
/// `Send + Sync` whenever the registry is and can be shared through `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = FlipDispatcher::new(bindings, Arc::new(container));
///
/// let source: Arc<dyn Mapper> = Arc::new(SourceMapper);
/// let call = Call::on::<SourceMapper, _>(&*source, "map", |m| m.map("x"));
/// let mapped = dispatcher.handle(call)?;
/// ```
pub struct FlipDispatcher<R: ?Sized = Container> {
    bindings: FlipBindings,
    registry: Arc<R>,
}

impl<R: ComponentRegistry + ?Sized> FlipDispatcher<R> {
    /// Create a dispatcher over `bindings`, resolving alternates from `registry`.
    pub fn new(bindings: FlipBindings, registry: Arc<R>) -> Self {
        Self { bindings, registry }
    }

    /// The binding table.
    pub fn bindings(&self) -> &FlipBindings {
        &self.bindings
    }

    /// The registry alternates are resolved from.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Decide where a call declared on `declaring` goes, without running it.
    pub fn route_for(&self, declaring: &ComponentKey) -> Result<Route, FlipError> {
        match self.bindings.alternate_for(declaring) {
            Some(alternate) => Ok(Route::decide(*declaring, alternate)),
            None => {
                #[cfg(feature = "tracing")]
                tracing::error!(declaring = %declaring, "no flip declared for intercepted type");
                Err(FlipError::MissingDeclaration {
                    declaring: *declaring,
                })
            }
        }
    }

    /// Run `call` on whichever implementation its binding selects.
    pub fn handle<C, F, T>(&self, call: Call<'_, C, F>) -> Result<T, FlipError>
    where
        C: ?Sized + 'static,
        F: FnOnce(&C) -> Result<T, BoxError>,
    {
        let declaring = call.declaring();
        let operation = call.operation();

        let alternate = match self.route_for(&declaring)? {
            Route::Proceed => {
                #[cfg(feature = "tracing")]
                tracing::debug!(declaring = %declaring, operation, "proceeding with original");
                return call.proceed().map_err(proceed_failure);
            }
            Route::Redirect(alternate) => alternate,
        };

        let component = self.registry.resolve(&alternate).map_err(|error| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                declaring = %declaring,
                alternate = %alternate,
                %error,
                "alternate could not be resolved"
            );
            FlipError::Resolution {
                declaring,
                alternate,
                error,
            }
        })?;

        let Some(target) = component.view::<C>() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                alternate = %alternate,
                capability = call.capability(),
                operation,
                "alternate does not implement the capability of the call"
            );
            return Err(FlipError::IncompatibleTarget {
                alternate,
                capability: call.capability(),
                operation,
            });
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(declaring = %declaring, alternate = %alternate, operation, "flipping call");

        call.redirect(&*target)
            .map_err(|cause| redirect_failure(alternate, operation, cause))
    }
}

impl<R: ?Sized> Clone for FlipDispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<R: ?Sized> std::fmt::Debug for FlipDispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipDispatcher")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

fn proceed_failure(cause: BoxError) -> FlipError {
    match disabled_signal(cause) {
        Ok(signal) => FlipError::FeatureDisabled(signal),
        Err(cause) => FlipError::Proceed(cause),
    }
}

fn redirect_failure(alternate: ComponentKey, operation: &'static str, cause: BoxError) -> FlipError {
    match disabled_signal(cause) {
        Ok(signal) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(alternate = %alternate, operation, "alternate reports feature disabled");
            FlipError::FeatureDisabled(signal)
        }
        Err(cause) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(alternate = %alternate, operation, error = %cause, "alternate failed");
            FlipError::Invocation {
                alternate,
                operation,
                cause,
            }
        }
    }
}

// The signal arrives bare, or inside a `FlipError` when the implementation
// that ran is itself a flipped service.
fn disabled_signal(cause: BoxError) -> Result<FeatureNotEnabled, BoxError> {
    let cause = match cause.downcast::<FeatureNotEnabled>() {
        Ok(signal) => return Ok(*signal),
        Err(cause) => cause,
    };
    match cause.downcast::<FlipError>() {
        Ok(inner) => match *inner {
            FlipError::FeatureDisabled(signal) => Ok(signal),
            other => Err(other.into()),
        },
        Err(cause) => Err(cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallCounter, FailingRegistry, RecordingRegistry};
    use flips_core::{Component, FlipErrorKind};

    trait Mapper: Send + Sync {
        fn map(&self, input: &str) -> Result<String, BoxError>;
    }

    struct Source {
        calls: CallCounter,
    }

    impl Mapper for Source {
        fn map(&self, input: &str) -> Result<String, BoxError> {
            self.calls.hit();
            Ok(format!("{input}:SOURCE"))
        }
    }

    struct Target {
        calls: CallCounter,
    }

    impl Mapper for Target {
        fn map(&self, input: &str) -> Result<String, BoxError> {
            self.calls.hit();
            Ok(format!("{input}:TARGET"))
        }
    }

    struct Unrelated;

    fn registry_with_target(calls: &CallCounter) -> RecordingRegistry<Container> {
        let container = Container::builder()
            .component(
                Component::builder(Target {
                    calls: calls.clone(),
                })
                .expose::<dyn Mapper>(|c| c)
                .build(),
            )
            .component(Component::builder(Unrelated).build())
            .build()
            .unwrap();
        RecordingRegistry::new(container)
    }

    fn source(calls: &CallCounter) -> Arc<dyn Mapper> {
        Arc::new(Source {
            calls: calls.clone(),
        })
    }

    fn map_via<R: ComponentRegistry + ?Sized>(
        dispatcher: &FlipDispatcher<R>,
        source: &Arc<dyn Mapper>,
        input: &str,
    ) -> Result<String, FlipError> {
        dispatcher.handle(Call::on::<Source, _>(&**source, "map", |m| m.map(input)))
    }

    #[test]
    fn test_self_binding_proceeds_without_registry() {
        let source_calls = CallCounter::new();
        let target_calls = CallCounter::new();
        let registry = Arc::new(registry_with_target(&target_calls));
        let bindings = FlipBindings::builder().keep::<Source>().build().unwrap();
        let dispatcher = FlipDispatcher::new(bindings, registry.clone());

        let out = map_via(&dispatcher, &source(&source_calls), "x").unwrap();

        assert_eq!(out, "x:SOURCE");
        assert_eq!(source_calls.count(), 1);
        assert_eq!(target_calls.count(), 0);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_redirect_runs_alternate_once() {
        let source_calls = CallCounter::new();
        let target_calls = CallCounter::new();
        let registry = Arc::new(registry_with_target(&target_calls));
        let bindings = FlipBindings::builder()
            .bind::<Source, Target>()
            .build()
            .unwrap();
        let dispatcher = FlipDispatcher::new(bindings, registry.clone());

        let out = map_via(&dispatcher, &source(&source_calls), "x").unwrap();

        assert_eq!(out, "x:TARGET");
        assert_eq!(source_calls.count(), 0);
        assert_eq!(target_calls.count(), 1);
        assert_eq!(registry.count_for(&ComponentKey::of::<Target>()), 1);
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_missing_declaration() {
        let dispatcher = FlipDispatcher::new(FlipBindings::default(), Arc::new(Container::new()));

        let calls = CallCounter::new();
        let err = map_via(&dispatcher, &source(&calls), "x").unwrap_err();

        assert_eq!(err.kind(), FlipErrorKind::ConfigurationIntegrity);
        assert_eq!(calls.count(), 0);
    }

    #[test]
    fn test_alternate_without_capability_is_incompatible() {
        let registry = Arc::new(registry_with_target(&CallCounter::new()));
        let bindings = FlipBindings::builder()
            .bind::<Source, Unrelated>()
            .build()
            .unwrap();
        let dispatcher = FlipDispatcher::new(bindings, registry);

        let calls = CallCounter::new();
        let err = map_via(&dispatcher, &source(&calls), "x").unwrap_err();

        match err {
            FlipError::IncompatibleTarget {
                alternate,
                operation,
                capability,
            } => {
                assert_eq!(alternate, ComponentKey::of::<Unrelated>());
                assert_eq!(operation, "map");
                assert!(capability.contains("Mapper"));
            }
            other => panic!("expected incompatible target, got {other:?}"),
        }
        assert_eq!(calls.count(), 0);
    }

    #[test]
    fn test_registry_failure_is_wrapped() {
        let dispatcher = FlipDispatcher::new(
            FlipBindings::builder()
                .bind::<Source, Target>()
                .build()
                .unwrap(),
            Arc::new(FailingRegistry::new("container offline")),
        );

        let err = map_via(&dispatcher, &source(&CallCounter::new()), "x").unwrap_err();

        assert_eq!(err.kind(), FlipErrorKind::RedirectResolution);
        let rendered = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(rendered.as_deref(), Some("container offline"));
    }

    #[test]
    fn test_route_for() {
        let dispatcher = FlipDispatcher::new(
            FlipBindings::builder()
                .bind::<Source, Target>()
                .keep::<Target>()
                .build()
                .unwrap(),
            Arc::new(Container::new()),
        );

        assert_eq!(
            dispatcher.route_for(&ComponentKey::of::<Source>()).unwrap(),
            Route::Redirect(ComponentKey::of::<Target>())
        );
        assert_eq!(
            dispatcher.route_for(&ComponentKey::of::<Target>()).unwrap(),
            Route::Proceed
        );
        assert!(
            dispatcher
                .route_for(&ComponentKey::of::<Unrelated>())
                .is_err()
        );
    }

    #[test]
    fn test_boxed_flip_error_signal_is_recognized() {
        struct Nested;
        impl Mapper for Nested {
            fn map(&self, _input: &str) -> Result<String, BoxError> {
                Err(Box::new(FlipError::FeatureDisabled(FeatureNotEnabled::new("inner off"))))
            }
        }

        let container = Container::builder()
            .component(Component::builder(Nested).expose::<dyn Mapper>(|c| c).build())
            .build()
            .unwrap();
        let dispatcher = FlipDispatcher::new(
            FlipBindings::builder().bind::<Source, Nested>().build().unwrap(),
            Arc::new(container),
        );

        let err = map_via(&dispatcher, &source(&CallCounter::new()), "x").unwrap_err();
        assert_eq!(err.kind(), FlipErrorKind::FeatureDisabled);
        assert_eq!(
            err.feature_disabled().map(FeatureNotEnabled::message),
            Some("inner off")
        );
    }

    #[test]
    fn test_original_failure_passes_through() {
        struct Broken;
        impl Mapper for Broken {
            fn map(&self, _input: &str) -> Result<String, BoxError> {
                Err("disk full".into())
            }
        }

        let dispatcher = FlipDispatcher::new(
            FlipBindings::builder().keep::<Broken>().build().unwrap(),
            Arc::new(Container::new()),
        );
        let broken: Arc<dyn Mapper> = Arc::new(Broken);
        let call = Call::on::<Broken, _>(&*broken, "map", |m| m.map("x"));
        let err = dispatcher.handle(call).unwrap_err();

        assert_eq!(err.kind(), FlipErrorKind::Proceed);
        assert_eq!(err.to_string(), "disk full");
    }
}
