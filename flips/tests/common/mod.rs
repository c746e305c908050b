#![allow(dead_code)]

use flips::{
    BoxError, Component, Container, FeatureNotEnabled, FlipBindings, FlipDispatcher, FlipError,
    Flippable,
    testing::{CallCounter, RecordingRegistry},
};
use std::{fmt, sync::Arc};

// ============================================================================
// Capabilities
// ============================================================================

pub trait Mapper: Send + Sync {
    fn map(&self, input: &str) -> Result<String, BoxError>;
}

/// Day numbers since an arbitrary epoch.
pub trait DateSource: Send + Sync {
    fn current_date(&self) -> Result<u64, BoxError>;
    fn next_date(&self) -> Result<u64, BoxError>;
    fn previous_date(&self) -> Result<u64, BoxError>;
}

// ============================================================================
// Implementations
// ============================================================================

pub const TODAY: u64 = 20_000;

/// The source implementation: maps and tells dates.
pub struct SourceService {
    pub calls: CallCounter,
}

impl Mapper for SourceService {
    fn map(&self, input: &str) -> Result<String, BoxError> {
        self.calls.hit();
        Ok(format!("{input}:SOURCE"))
    }
}

impl DateSource for SourceService {
    fn current_date(&self) -> Result<u64, BoxError> {
        self.calls.hit();
        Ok(TODAY)
    }

    fn next_date(&self) -> Result<u64, BoxError> {
        self.calls.hit();
        Ok(TODAY + 1)
    }

    fn previous_date(&self) -> Result<u64, BoxError> {
        self.calls.hit();
        Ok(TODAY - 1)
    }
}

/// The alternate: maps only.
pub struct TargetService {
    pub calls: CallCounter,
}

impl Mapper for TargetService {
    fn map(&self, input: &str) -> Result<String, BoxError> {
        self.calls.hit();
        Ok(format!("{input}:TARGET"))
    }
}

/// An alternate date source running a week ahead.
pub struct ShiftedDates;

impl DateSource for ShiftedDates {
    fn current_date(&self) -> Result<u64, BoxError> {
        Ok(TODAY + 7)
    }

    fn next_date(&self) -> Result<u64, BoxError> {
        Ok(TODAY + 8)
    }

    fn previous_date(&self) -> Result<u64, BoxError> {
        Ok(TODAY + 6)
    }
}

/// An alternate that refuses every call.
pub struct DisabledService;

impl Mapper for DisabledService {
    fn map(&self, _input: &str) -> Result<String, BoxError> {
        Err(FeatureNotEnabled::new("target mapping is switched off")
            .for_operation("map")
            .into())
    }
}

/// An alternate whose mapping always fails.
pub struct FailingService;

impl Mapper for FailingService {
    fn map(&self, input: &str) -> Result<String, BoxError> {
        Err(Box::new(MappingFailed {
            input: input.to_string(),
        }))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MappingFailed {
    pub input: String,
}

impl fmt::Display for MappingFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot map `{}`", self.input)
    }
}

impl std::error::Error for MappingFailed {}

// ============================================================================
// Decorators
// ============================================================================

pub type Registry = RecordingRegistry<Container>;

pub struct FlippedMapper(pub Flippable<dyn Mapper, Registry>);

impl Mapper for FlippedMapper {
    fn map(&self, input: &str) -> Result<String, BoxError> {
        self.0
            .invoke("map", |m| m.map(input))
            .map_err(FlipError::into_box_error)
    }
}

pub struct FlippedDates(pub Flippable<dyn DateSource, Registry>);

impl DateSource for FlippedDates {
    fn current_date(&self) -> Result<u64, BoxError> {
        self.0
            .invoke("current_date", |d| d.current_date())
            .map_err(FlipError::into_box_error)
    }

    fn next_date(&self) -> Result<u64, BoxError> {
        self.0
            .invoke("next_date", |d| d.next_date())
            .map_err(FlipError::into_box_error)
    }

    fn previous_date(&self) -> Result<u64, BoxError> {
        self.0
            .invoke("previous_date", |d| d.previous_date())
            .map_err(FlipError::into_box_error)
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// A populated registry plus counters for the source and target services.
pub struct Fixture {
    pub source_calls: CallCounter,
    pub target_calls: CallCounter,
    pub registry: Arc<Registry>,
}

impl Fixture {
    pub fn new() -> Self {
        let source_calls = CallCounter::new();
        let target_calls = CallCounter::new();

        let container = Container::builder()
            .component(
                Component::builder(SourceService {
                    calls: source_calls.clone(),
                })
                .named("source")
                .expose::<dyn Mapper>(|c| c)
                .expose::<dyn DateSource>(|c| c)
                .build(),
            )
            .component(
                Component::builder(TargetService {
                    calls: target_calls.clone(),
                })
                .named("target")
                .expose::<dyn Mapper>(|c| c)
                .build(),
            )
            .component(
                Component::builder(ShiftedDates)
                    .named("shifted")
                    .expose::<dyn DateSource>(|c| c)
                    .build(),
            )
            .component(
                Component::builder(DisabledService)
                    .named("disabled")
                    .expose::<dyn Mapper>(|c| c)
                    .build(),
            )
            .component(
                Component::builder(FailingService)
                    .named("failing")
                    .expose::<dyn Mapper>(|c| c)
                    .build(),
            )
            .build()
            .unwrap();

        Self {
            source_calls,
            target_calls,
            registry: Arc::new(RecordingRegistry::new(container)),
        }
    }

    pub fn container(&self) -> &Container {
        self.registry.inner()
    }

    pub fn dispatcher(&self, bindings: FlipBindings) -> Arc<FlipDispatcher<Registry>> {
        Arc::new(FlipDispatcher::new(bindings, self.registry.clone()))
    }

    fn source(&self) -> Arc<SourceService> {
        Arc::new(SourceService {
            calls: self.source_calls.clone(),
        })
    }

    pub fn mapper(&self, bindings: FlipBindings) -> FlippedMapper {
        let source: Arc<dyn Mapper> = self.source();
        FlippedMapper(Flippable::new::<SourceService>(source, self.dispatcher(bindings)))
    }

    pub fn dates(&self, bindings: FlipBindings) -> FlippedDates {
        let source: Arc<dyn DateSource> = self.source();
        FlippedDates(Flippable::new::<SourceService>(source, self.dispatcher(bindings)))
    }
}

pub fn bind_source_to<A: 'static>() -> FlipBindings {
    FlipBindings::builder()
        .bind::<SourceService, A>()
        .build()
        .unwrap()
}

pub fn keep_source() -> FlipBindings {
    FlipBindings::builder()
        .keep::<SourceService>()
        .build()
        .unwrap()
}
