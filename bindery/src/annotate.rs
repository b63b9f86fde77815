//! Attaching constructor injection metadata to a class without decorators.
//!
//! [`annotate`] marks a class injectable and records, per constructor
//! parameter, the identifier to resolve and any qualifier to require. The
//! container reads this metadata back when it instantiates a class binding.
//!
//! # Examples
//!
//! ```
//! use bindery::{annotate, injectable, Class, Container, Shared};
//!
//! struct Katana;
//! struct Shuriken;
//! struct Ninja {
//!     katana: Shared<Katana>,
//!     shuriken: Shared<Shuriken>,
//! }
//!
//! injectable!(Katana => Katana);
//! injectable!(Shuriken => Shuriken);
//! injectable!(Ninja { katana: Katana, shuriken: Shuriken });
//!
//! annotate(&Class::<Katana>::new(), Vec::<&'static str>::new()).unwrap();
//! annotate(&Class::<Shuriken>::new(), Vec::<&'static str>::new()).unwrap();
//! annotate(&Class::<Ninja>::new(), ["Katana", "Shuriken"]).unwrap();
//!
//! let container = Container::new();
//! container.bind("Katana").to(Class::<Katana>::new()).unwrap();
//! container.bind("Shuriken").to(Class::<Shuriken>::new()).unwrap();
//! container.bind("Ninja").to(Class::<Ninja>::new()).unwrap();
//!
//! let ninja = container.get::<Ninja>("Ninja");
//! # let _ = (&ninja.katana, &ninja.shuriken);
//! ```

use crate::error::Error;
use crate::identifier::TypeKey;
use crate::injectable::Class;
use crate::injection::Injection;
use crate::metadata::{self, ParameterMetadata};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Marks `class` injectable and records one injection per constructor parameter.
///
/// Descriptor `i` applies to parameter `i`; parameters past the end of the
/// list keep whatever was recorded before. Every descriptor is validated
/// before anything is written, so a rejected call leaves no trace.
///
/// A descriptor carrying both a name and a tag keeps both. Which binding such
/// a parameter resolves to is decided by the bindings' constraints, and two
/// matching bindings surface as an ambiguous match.
pub fn annotate<T, I>(class: &Class<T>, injections: I) -> Result<(), Error>
where
    T: ?Sized + 'static,
    I: IntoIterator,
    I::Item: Into<Injection>,
{
    Annotation::prepare(class, injections)?.record();
    Ok(())
}

fn parameter(key: TypeKey, index: usize, injection: Injection) -> Result<ParameterMetadata, Error> {
    match injection {
        Injection::Id(service) => Ok(ParameterMetadata {
            service: Some(service),
            ..ParameterMetadata::default()
        }),
        Injection::Qualified(qualified) => {
            let service = qualified
                .service
                .ok_or_else(|| Error::invalid_descriptor(key.name(), index))?;

            #[cfg(feature = "tracing")]
            if qualified.named.is_some() && qualified.tagged.is_some() {
                warn!(
                    "Parameter {} of {} is both named and tagged",
                    index,
                    key.name()
                );
            }

            Ok(ParameterMetadata {
                service: Some(service),
                named: qualified.named,
                tagged: qualified.tagged,
            })
        }
    }
}

/// Validated descriptors for one class, not yet written to the metadata table.
pub(crate) struct Annotation {
    key: TypeKey,
    parameters: Vec<ParameterMetadata>,
}

impl Annotation {
    pub(crate) fn prepare<T, I>(class: &Class<T>, injections: I) -> Result<Self, Error>
    where
        T: ?Sized + 'static,
        I: IntoIterator,
        I::Item: Into<Injection>,
    {
        let key = class.key();
        let parameters = injections
            .into_iter()
            .map(Into::<Injection>::into)
            .enumerate()
            .map(|(index, injection)| parameter(key, index, injection))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { key, parameters })
    }

    pub(crate) fn record(self) {
        #[cfg(feature = "tracing")]
        debug!(
            "Annotated {} as injectable ({} parameters)",
            self.key.name(),
            self.parameters.len()
        );

        metadata::record(self.key, self.parameters);
    }
}
