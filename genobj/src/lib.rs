//! Generic objects: open key/value bags whose accessors are synthesized on
//! first use.
//!
//! Any selector sent to an [`Object`] that is not one of its explicit
//! operations is classified as `set_<key>`, `get_<key>` or plain `<key>`,
//! checked against the allow-list of the object's class, and turned into an
//! [`Accessor`] cached on that class. Rejected or missing accesses answer
//! the False Sentinel ([`FALSE`]), which accepts any further message.
//!
//! ```
//! use genobj::{Receiver, Registry, RegistryCreateInfo, Value};
//!
//! let registry = Registry::new(RegistryCreateInfo::default());
//! let shape = registry.define_class("Shape");
//! shape.declare_allowed(["color", "height"]);
//!
//! let object = shape.create([("color", "red")]);
//! assert_eq!(object.read("color"), Value::from("red"));
//! object.write("color", "blue");
//! assert_eq!(object.read("get_color"), Value::from("blue"));
//! assert!(object.write("set_weight", 5).is_sentinel());
//! assert!(object.read("missing").read("anything").is_sentinel());
//! ```

mod accessor;
mod class;
mod error;
mod interning;
mod object;
mod receiver;
mod registry;
mod selector;
mod special;
mod value;

pub use accessor::{Accessor, Method};
pub use class::Class;
pub use error::Rejected;
pub use interning::{InternedId, InternedString, InternedStrings};
pub use object::Object;
pub use receiver::Receiver;
pub use registry::{CachePolicy, ClassId, Registry, RegistryCreateInfo};
pub use selector::{AccessKind, Reserved, Selector, is_identifier};
pub use special::{FALSE, False};
pub use value::Value;
