//! Bidirectional value mapping
//!
//! A [`Mapper`] converts between the value a backend speaks (`In`) and the value callers
//! want to see (`Out`). `to` is used when reading, `from` when writing. Both directions
//! may reject a value that has no representation on the other side.
//!
//! Mappers are expected to round-trip: `from(to(x))` should be observably equal to `x`
//! for every valid `x`. Mappers that can only do this approximately say so.

use core::marker::PhantomData;

use crate::MapError;

pub trait Mapper<In, Out> {
    /// Read direction
    fn to(&self, input: In) -> Result<Out, MapError>;

    /// Write direction
    fn from(&self, output: Out) -> Result<In, MapError>;

    /// Swaps `to` and `from`.
    fn inverse(self) -> Inverse<Self>
    where
        Self: Sized,
    {
        Inverse(self)
    }

    /// Applies `self`, then `next`, in the read direction. Writes go through `next` first.
    fn then<Next, Final>(self, next: Next) -> Then<Self, Next, Out>
    where
        Self: Sized,
        Next: Mapper<Out, Final>,
    {
        Then { first: self, second: next, _mid: PhantomData }
    }
}

impl<In, Out, M: Mapper<In, Out> + ?Sized> Mapper<In, Out> for &M {
    fn to(&self, input: In) -> Result<Out, MapError> {
        (**self).to(input)
    }

    fn from(&self, output: Out) -> Result<In, MapError> {
        (**self).from(output)
    }
}

/// See [`Mapper::inverse`].
#[derive(Debug, Clone, Copy)]
pub struct Inverse<M>(pub M);

impl<In, Out, M: Mapper<In, Out>> Mapper<Out, In> for Inverse<M> {
    fn to(&self, input: Out) -> Result<In, MapError> {
        self.0.from(input)
    }

    fn from(&self, output: In) -> Result<Out, MapError> {
        self.0.to(output)
    }
}

pub fn inverse<M>(mapper: M) -> Inverse<M> {
    Inverse(mapper)
}

/// See [`Mapper::then`].
pub struct Then<A, B, Mid> {
    first: A,
    second: B,
    _mid: PhantomData<fn(Mid) -> Mid>,
}

impl<A: Clone, B: Clone, Mid> Clone for Then<A, B, Mid> {
    fn clone(&self) -> Self {
        Then {
            first: self.first.clone(),
            second: self.second.clone(),
            _mid: PhantomData,
        }
    }
}

impl<In, Mid, Out, A, B> Mapper<In, Out> for Then<A, B, Mid>
where
    A: Mapper<In, Mid>,
    B: Mapper<Mid, Out>,
{
    fn to(&self, input: In) -> Result<Out, MapError> {
        self.second.to(self.first.to(input)?)
    }

    fn from(&self, output: Out) -> Result<In, MapError> {
        self.first.from(self.second.from(output)?)
    }
}

/// A mapper made of two closures, see [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnMapper<T, F> {
    to: T,
    from: F,
}

impl<In, Out, T, F> Mapper<In, Out> for FnMapper<T, F>
where
    T: Fn(In) -> Result<Out, MapError>,
    F: Fn(Out) -> Result<In, MapError>,
{
    fn to(&self, input: In) -> Result<Out, MapError> {
        (self.to)(input)
    }

    fn from(&self, output: Out) -> Result<In, MapError> {
        (self.from)(output)
    }
}

pub fn from_fn<In, Out, T, F>(to: T, from: F) -> FnMapper<T, F>
where
    T: Fn(In) -> Result<Out, MapError>,
    F: Fn(Out) -> Result<In, MapError>,
{
    FnMapper { to, from }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stringify() -> impl Mapper<i32, String> + Clone {
        from_fn(
            |n: i32| Ok(n.to_string()),
            |s: String| s.parse::<i32>().map_err(|e| MapError::custom(e.to_string())),
        )
    }

    #[test]
    fn fn_mapper() {
        let m = stringify();
        assert_eq!(m.to(12).unwrap(), "12");
        assert_eq!(m.from("12".to_owned()).unwrap(), 12);
        assert!(m.from("twelve".to_owned()).is_err());
    }

    #[test]
    fn inverse_swaps_directions() {
        let m = stringify().inverse();
        assert_eq!(m.to("7".to_owned()).unwrap(), 7);
        assert_eq!(m.from(7).unwrap(), "7");
        assert!(m.to("x".to_owned()).is_err());
    }

    #[test]
    fn then_chains_in_order() {
        let tag = from_fn(
            |s: String| Ok(format!("#{s}")),
            |s: String| {
                s.strip_prefix('#')
                    .map(str::to_owned)
                    .ok_or_else(|| MapError::custom("missing #"))
            },
        );
        let m = stringify().then(tag);

        assert_eq!(m.to(1234).unwrap(), "#1234");
        assert_eq!(m.from("#5".to_owned()).unwrap(), 5);
        // writes run through the second mapper first
        assert_eq!(m.from("5".to_owned()), Err(MapError::custom("missing #")));
    }
}
