use std::marker::PhantomData;

/// A strongly-typed, `String`-named reference to a "resource" (`TResource`)
/// stored within some other data-store (`TSource`) without holding a Rust
/// reference to that data-store. De-referencing a [NamedRef] is done via
/// [NamedRef::deref()] by handing it the `TSource` explicitly.
///
/// Union members and implemented interfaces point at other
/// [crate::schema::GraphQLType]s this way, and every
/// [crate::ir::NamedFragmentSpread] points at the fragment
/// [crate::operation::Definition] it spreads. Because spreads refer to their
/// fragment by name, a fragment's selection sets are shared by every spread
/// site and a compiled document never needs to hold references into itself.
#[derive(Debug)]
pub struct NamedRef<
    TSource,
    TRefLocation,
    TResource: DerefByName<Source=TSource, RefLocation=TRefLocation>,
> {
    name: String,
    phantom: PhantomData<TResource>,
    ref_location: TRefLocation,
}
impl<
    TSource,
    TRefLocation,
    TResource: DerefByName<Source=TSource, RefLocation=TRefLocation>,
> NamedRef<TSource, TRefLocation, TResource> {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn new(
        name: impl AsRef<str>,
        ref_location: TRefLocation,
    ) -> NamedRef<TSource, TRefLocation, TResource> {
        NamedRef {
            name: name.as_ref().to_string(),
            ref_location,
            phantom: PhantomData,
        }
    }

    pub fn ref_location(&self) -> &TRefLocation {
        &self.ref_location
    }

    pub fn deref<'a>(
        &self,
        source: &'a TSource,
    ) -> Result<&'a TResource, DerefByNameError> {
        TResource::deref_name(source, self.name.as_str())
    }
}

impl<
    TSource,
    TRefLocation: Clone,
    TResource: DerefByName<Source=TSource, RefLocation=TRefLocation>,
> Clone for NamedRef<TSource, TRefLocation, TResource> {
    fn clone(&self) -> Self {
        Self::new(self.name.as_str(), self.ref_location.clone())
    }
}

// Two references are the same reference when they name the same resource. The
// location of the reference is provenance, not identity.
impl<
    TSource,
    TRefLocation,
    TResource: DerefByName<Source=TSource, RefLocation=TRefLocation>,
> PartialEq for NamedRef<TSource, TRefLocation, TResource> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl<
    TSource,
    TRefLocation,
    TResource: DerefByName<Source=TSource, RefLocation=TRefLocation>,
> Eq for NamedRef<TSource, TRefLocation, TResource> {}

/// Implement this trait for any type that could be referenced by name. This
/// enables usage of [NamedRef] for that type.
pub trait DerefByName: core::fmt::Debug {
    type Source;
    type RefLocation;

    fn deref_name<'a>(
        source: &'a Self::Source,
        name: &str,
    ) -> Result<&'a Self, DerefByNameError> where Self: Sized;

    fn named_ref(name: &str, ref_location: Self::RefLocation) -> NamedRef<
        Self::Source,
        Self::RefLocation,
        Self,
    > where Self: Sized {
        NamedRef::<Self::Source, Self::RefLocation, Self>::new(
            name,
            ref_location,
        )
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DerefByNameError {
    #[error("Dangling reference to `{0}`")]
    DanglingReference(String),
}
