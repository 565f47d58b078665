//! The extraction facade.
//!
//! An [`Extractor`] bundles everything a resolution needs: the mapper registry
//! used to compile paths, the collaborators the evaluator asks about values,
//! engine options, and a cache of compiled paths keyed by path text.
//!
//! # Example
//!
//! ```
//! use objpath::engine::Extractor;
//! use objpath::value::{Object, Value};
//!
//! let root = Value::from(
//!     Object::new("Order").with_field("lines", Value::list(["a", "b", "c"])),
//! );
//!
//! let extractor = Extractor::new();
//! let second: Option<String> = extractor.get(&root, "/lines[1]").unwrap();
//! assert_eq!(second.as_deref(), Some("b"));
//!
//! let tail: Vec<String> = extractor.list(&root, "/lines[1:]").unwrap();
//! assert_eq!(tail, vec!["b", "c"]);
//! ```

use crate::config::Config;
use crate::convert::FromValue;
use crate::error::{PathError, Result};
use crate::extract::access::{
    CollectionFactory, DefaultCollections, FieldAccess, MemberAccess, TypeClassifier,
    ValueClassifier,
};
use crate::extract::adapter::Element;
use crate::extract::evaluator::{Evaluator, ExtractionContext, Mode};
use crate::path::mapper::{MapperRegistry, ValueMapper};
use crate::path::parser::{is_valid_identifier, Parser};
use crate::path::CompiledPath;
use crate::value::Value;
use log::debug;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock};

type PathCache = Mutex<LruCache<String, Arc<CompiledPath>>>;

/// Compiles paths and resolves them against value graphs.
///
/// An `Extractor` is `Send + Sync`; one instance can serve many threads.
pub struct Extractor {
    config: Config,
    registry: MapperRegistry,
    access: Box<dyn MemberAccess>,
    classifier: Box<dyn TypeClassifier>,
    factory: Box<dyn CollectionFactory>,
    cache: Option<PathCache>,
}

impl Extractor {
    /// Creates an extractor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let cache = NonZeroUsize::new(config.path_cache_size)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));

        Self {
            config,
            registry: MapperRegistry::new(),
            access: Box::new(FieldAccess),
            classifier: Box::new(ValueClassifier),
            factory: Box::new(DefaultCollections),
            cache,
        }
    }

    pub fn with_member_access(mut self, access: impl MemberAccess + 'static) -> Self {
        self.access = Box::new(access);
        self
    }

    pub fn with_classifier(mut self, classifier: impl TypeClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_collection_factory(mut self, factory: impl CollectionFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &MapperRegistry {
        &self.registry
    }

    /// Names usable after `.` in paths compiled by this extractor, sorted.
    pub fn mapper_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Registers a value mapper usable as `.name` in paths compiled by this
    /// extractor, returning the mapper it replaces.
    ///
    /// Cached paths are dropped, since they may hold the replaced mapper.
    pub fn register_mapper<F>(&mut self, name: &str, func: F) -> Result<Option<ValueMapper>>
    where
        F: for<'a> Fn(Element<'a>) -> Element<'a> + Send + Sync + 'static,
    {
        if !is_valid_identifier(name) {
            return Err(PathError::malformed(
                name,
                format!("'{}' is not a valid mapper name", name),
            ));
        }

        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
        Ok(self.registry.register(name, func))
    }

    /// Compiles `path`, reusing a cached compilation when one exists.
    pub fn compile(&self, path: &str) -> Result<Arc<CompiledPath>> {
        let Some(cache) = &self.cache else {
            return self.parse(path).map(Arc::new);
        };

        if let Some(compiled) = cache.lock().get(path) {
            debug!("path cache hit for '{}'", path);
            return Ok(Arc::clone(compiled));
        }

        debug!("path cache miss for '{}'", path);
        let compiled = Arc::new(self.parse(path)?);
        cache.lock().put(path.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    fn parse(&self, path: &str) -> Result<CompiledPath> {
        Parser::new(&self.registry)
            .with_max_segments(self.config.max_segments)
            .parse(path)
    }

    /// Resolves `path` into a single value.
    ///
    /// Returns `Ok(None)` when the path leads to null, or to nothing for a
    /// non-container `T`. Several values requested as a scalar `T` are an
    /// `AmbiguousCardinality` error.
    pub fn get<T: FromValue>(&self, root: &Value, path: &str) -> Result<Option<T>> {
        let compiled = self.compile(path)?;
        self.get_compiled(root, &compiled)
    }

    /// Resolves `path` into a list. Never fails for lack of matches.
    pub fn list<T: FromValue>(&self, root: &Value, path: &str) -> Result<Vec<T>> {
        let compiled = self.compile(path)?;
        self.list_compiled(root, &compiled)
    }

    pub fn get_compiled<T: FromValue>(&self, root: &Value, path: &CompiledPath) -> Result<Option<T>> {
        let evaluator = self.evaluator();
        let ctx = ExtractionContext::for_type::<T>(Mode::Get);
        let extracted = evaluator.resolve(root, path.segments(), &ctx)?;

        evaluator.finish_get(extracted).map(T::from_value).transpose()
    }

    pub fn list_compiled<T: FromValue>(&self, root: &Value, path: &CompiledPath) -> Result<Vec<T>> {
        let evaluator = self.evaluator();
        let ctx = ExtractionContext::for_type::<T>(Mode::List);
        let extracted = evaluator.resolve(root, path.segments(), &ctx)?;

        evaluator
            .finish_list(extracted)
            .into_iter()
            .map(T::from_value)
            .collect()
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&*self.access, &*self.classifier, &*self.factory)
            .unknown_field_as_null(self.config.unknown_field_as_null)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT: LazyLock<Extractor> = LazyLock::new(Extractor::new);

/// [`Extractor::get`] on a shared default extractor.
pub fn get<T: FromValue>(root: &Value, path: &str) -> Result<Option<T>> {
    DEFAULT.get(root, path)
}

/// [`Extractor::list`] on a shared default extractor.
pub fn list<T: FromValue>(root: &Value, path: &str) -> Result<Vec<T>> {
    DEFAULT.list(root, path)
}

/// [`Extractor::compile`] on a shared default extractor.
pub fn compile(path: &str) -> Result<Arc<CompiledPath>> {
    DEFAULT.compile(path)
}
