//! # Parameter Value Resolver
//!
//! Looks a declared parameter up in the request collection its location
//! designates and coerces the raw value to the declared type.
//!
//! The resolver only reads its inputs: neither the descriptor nor the request
//! is modified, so resolving the same pair twice yields the same result.

use crate::coerce::coerce;
use crate::config::ResolverConfig;
use crate::descriptor::ParameterDescriptor;
use crate::error::{ParamError, ParamResult};
use crate::request::{RawValue, RequestAccessor};
use crate::value::ParamValue;
use indexmap::IndexMap;

/// Resolves parameter values with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Creates a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the coerced value of `descriptor` in `request`.
    ///
    /// # Errors
    ///
    /// * [`ParamError::MissingParameter`] if the parameter is absent from its location.
    /// * [`ParamError::InvalidParameterType`] if the value cannot be coerced.
    /// * [`ParamError::InvalidParameterDefinition`] if the descriptor is unusable.
    pub fn resolve<D, R>(&self, descriptor: &D, request: &R) -> ParamResult<ParamValue>
    where
        D: ParameterDescriptor,
        R: RequestAccessor + ?Sized,
    {
        let name = descriptor.name();
        let location = descriptor.location();
        let Some(raw) = request.lookup(location, name) else {
            tracing::debug!(name, %location, "parameter missing");
            return Err(ParamError::MissingParameter {
                name: name.to_string(),
                location,
            });
        };
        self.coerce_raw(descriptor, raw)
    }

    /// Like [`resolve`](Self::resolve), but an absent parameter yields its
    /// declared default (coerced like a body value) or `None`.
    pub fn resolve_or_default<D, R>(
        &self,
        descriptor: &D,
        request: &R,
    ) -> ParamResult<Option<ParamValue>>
    where
        D: ParameterDescriptor,
        R: RequestAccessor + ?Sized,
    {
        match request.lookup(descriptor.location(), descriptor.name()) {
            Some(raw) => self.coerce_raw(descriptor, raw).map(Some),
            None => descriptor
                .default_value()
                .map(|default| self.coerce_raw(descriptor, RawValue::Json(default)))
                .transpose(),
        }
    }

    /// Resolves every descriptor, keyed by parameter name in declaration order.
    ///
    /// Required parameters must be present. Optional ones fall back to their
    /// default and are left out when they have none.
    pub fn resolve_all<D, R>(
        &self,
        descriptors: &[D],
        request: &R,
    ) -> ParamResult<IndexMap<String, ParamValue>>
    where
        D: ParameterDescriptor,
        R: RequestAccessor + ?Sized,
    {
        let mut values = IndexMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let value = if descriptor.required() {
                Some(self.resolve(descriptor, request)?)
            } else {
                self.resolve_or_default(descriptor, request)?
            };
            if let Some(value) = value {
                values.insert(descriptor.name().to_string(), value);
            }
        }
        Ok(values)
    }

    fn coerce_raw<D: ParameterDescriptor>(
        &self,
        descriptor: &D,
        raw: RawValue<'_>,
    ) -> ParamResult<ParamValue> {
        let name = descriptor.name();
        let location = descriptor.location();
        match coerce(name, descriptor, raw, &self.config) {
            Ok(value) => {
                tracing::trace!(name, %location, ?value, "parameter resolved");
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(name, %location, %error, "parameter rejected");
                Err(error)
            }
        }
    }
}

/// Returns the value of `descriptor` in `request` using the default configuration.
///
/// See [`Resolver::resolve`].
pub fn value_of_param<D, R>(descriptor: &D, request: &R) -> ParamResult<ParamValue>
where
    D: ParameterDescriptor,
    R: RequestAccessor + ?Sized,
{
    Resolver::default().resolve(descriptor, request)
}

/// Returns the value of `descriptor`, its default, or `None`, using the default configuration.
///
/// See [`Resolver::resolve_or_default`].
pub fn value_of_param_or_default<D, R>(
    descriptor: &D,
    request: &R,
) -> ParamResult<Option<ParamValue>>
where
    D: ParameterDescriptor,
    R: RequestAccessor + ?Sized,
{
    Resolver::default().resolve_or_default(descriptor, request)
}
