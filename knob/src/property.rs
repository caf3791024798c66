//! The read / write / observe contract
//!
//! A property is built from whichever capabilities its backend actually has; the rest
//! fall back to stand-ins that fail with [`Error::Unsupported`]. `Property::default()`
//! has none at all.
//!
//! ```
//! # use knob::{Capability, Error, Property};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let temperature = Property::read_only(|_signal| async { Ok(21.5) });
//!
//! assert_eq!(temperature.get(None).await.unwrap(), 21.5);
//! assert!(matches!(
//!     temperature.set(20.0, None).await,
//!     Err(Error::Unsupported(Capability::Write))
//! ));
//! # }
//! ```

use core::future::Future;
use std::sync::Arc;

use futures::{
    FutureExt as _,
    future::{self, BoxFuture},
};
use knob_common::Mapper;

use crate::{CancellationToken, Capability, Error, Observer, Result, cancellable};

type ReadFn<V> = Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<V>> + Send + Sync>;
type WriteFn<V> = Arc<dyn Fn(CancellationToken, V) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// A value that can be read, written and observed.
///
/// Cloning is cheap; clones share their backend.
pub struct Property<V> {
    read: Option<ReadFn<V>>,
    write: Option<WriteFn<V>>,
    observe: Option<Observer<V>>,
}

impl<V> Default for Property<V> {
    fn default() -> Self {
        Self { read: None, write: None, observe: None }
    }
}

impl<V> Clone for Property<V> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
            observe: self.observe.clone(),
        }
    }
}

impl<V: Send + 'static> Property<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only<F, Fut>(read: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        Self::new().with_read(read)
    }

    pub fn write_only<F, Fut>(write: F) -> Self
    where
        F: Fn(CancellationToken, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::new().with_write(write)
    }

    pub fn with_read<F, Fut>(mut self, read: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        self.read = Some(Arc::new(move |signal: CancellationToken| read(signal).boxed()));
        self
    }

    pub fn with_write<F, Fut>(mut self, write: F) -> Self
    where
        F: Fn(CancellationToken, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.write = Some(Arc::new(move |signal: CancellationToken, value: V| {
            write(signal, value).boxed()
        }));
        self
    }

    pub fn with_observe(mut self, observer: Observer<V>) -> Self {
        self.observe = Some(observer);
        self
    }

    pub fn is_readable(&self) -> bool {
        self.read.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    pub fn is_observable(&self) -> bool {
        self.observe.is_some()
    }

    pub async fn get(&self, signal: Option<&CancellationToken>) -> Result<V> {
        let signal = signal.cloned().unwrap_or_default();

        if signal.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let Some(read) = &self.read else {
            return Err(Error::Unsupported(Capability::Read));
        };

        cancellable(&signal, read(signal.clone())).await
    }

    pub async fn set(&self, value: V, signal: Option<&CancellationToken>) -> Result<()> {
        let signal = signal.cloned().unwrap_or_default();

        if signal.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let Some(write) = &self.write else {
            return Err(Error::Unsupported(Capability::Write));
        };

        cancellable(&signal, write(signal.clone(), value)).await
    }

    /// Values of the property as they change. Opening it fails if the property can't be
    /// observed.
    pub fn observer(&self) -> Observer<V> {
        self.observe.clone().unwrap_or_else(Observer::not_observable)
    }

    /// Re-types the property through `mapper`.
    ///
    /// Reads go through [`Mapper::to`] after the backend was read, writes go through
    /// [`Mapper::from`] before the backend is touched, so a rejected write never reaches
    /// it. Capabilities this property lacks stay missing.
    pub fn map<Out, M>(self, mapper: M) -> Property<Out>
    where
        Out: Send + 'static,
        M: Mapper<V, Out> + Send + Sync + 'static,
    {
        let mapper = Arc::new(mapper);

        let read = self.read.map(|read| -> ReadFn<Out> {
            let mapper = mapper.clone();

            Arc::new(move |signal: CancellationToken| {
                let value = read(signal);
                let mapper = mapper.clone();

                async move {
                    let value = value.await?;

                    <M as Mapper<V, Out>>::to(&mapper, value).map_err(|e| {
                        tracing::debug!(error = %e, "read value rejected by mapper");
                        Error::from(e)
                    })
                }
                .boxed()
            })
        });

        let write = self.write.map(|write| -> WriteFn<Out> {
            let mapper = mapper.clone();

            Arc::new(move |signal: CancellationToken, value: Out| {
                match <M as Mapper<V, Out>>::from(&mapper, value) {
                    Ok(value) => write(signal, value),
                    Err(e) => {
                        tracing::debug!(error = %e, "written value rejected by mapper");
                        future::ready(Err(Error::from(e))).boxed()
                    }
                }
            })
        });

        let observe = self.observe.map(|observer| {
            observer.map(move |value| Ok(<M as Mapper<V, Out>>::to(&mapper, value)?))
        });

        Property { read, write, observe }
    }
}

/// Free-standing form of [`Property::map`].
pub fn apply_mapper<In, Out, M>(property: Property<In>, mapper: M) -> Property<Out>
where
    In: Send + 'static,
    Out: Send + 'static,
    M: Mapper<In, Out> + Send + Sync + 'static,
{
    property.map(mapper)
}
