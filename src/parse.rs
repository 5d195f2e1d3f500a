//! Helper macros for parsing packed records.
//!
//! The format is pretty much like `bincode` for structs:
//! fields are read back to back with no padding. The IS2
//! members pad their records with single tag bytes, which
//! are declared as `u8` fields and ignored.
#![allow(unused_macros)]

use std::{fmt::Display, io};

use byteordered::{byteorder::ReadBytesExt, ByteOrdered, Endian};

/// Declare a [`Parseable`] struct.
///
/// A make-do for a derive macro. Supports only simple structs
/// without generics.
macro_rules! declare_parseable_struct {
    (
        $(#[$smeta:meta])*
            $svis:vis struct $sname:ident {
                #format => $errh:expr,
                $($fvis:vis $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
            }
    ) => {

        $(#[$smeta])* #[allow(dead_code)]
            $svis struct $sname {
                $($fvis $name: declaration_type!($ty $(as $ty2)?)),*
            }

        impl crate::parse::Parseable for $sname {
            fn parse<T, E>(r: &mut byteordered::ByteOrdered<T, E>) -> std::io::Result<Self>
            where
                T: byteordered::byteorder::ReadBytesExt,
                E: byteordered::Endian,
            {
                parse_as_bindings!(
                    r, #format => $errh,
                    $( $name $(as $err)? => $ty $(as $ty2)? ),*
                );
                Ok($sname {
                    $( $name ),*
                })
            }
        }
    };
    (
        $(#[$smeta:meta])*
            $svis:vis struct $sname:ident {
                $($fvis:vis $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
            }
    ) => {
        declare_parseable_struct! {
            $(#[$smeta])*
                $svis struct $sname {
                    #format => |e| format!("parsing field `{}.{}`", stringify!($sname), e),
                    $($fvis $name $(as $err)? => $ty $(as $ty2)?),*
                }
        }
    };
}

/// Helper macro that expands to the parsed type or the
/// converted type.
macro_rules! declaration_type {
    ($ty:ty as $ty2:ty) => {
        $ty2
    };
    ($ty:ty) => {
        $ty
    };
}

/// Generate `let` bindings by parsing a reader.
macro_rules! parse_as_bindings {
    (
        $rdr: expr $(, #format => $errh:expr)?,
        $( $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
    ) => {
        #[allow(unused_parens)]
        let ($($name),*) = parse_from_reader!(
            $rdr $(, $errh)?,
            $( $ty $(as $ty2)? => stringify_binding!($name $(as $err)?) ),*
        );
    };
}

/// Helper macro to generate error context as a given
/// expression, or default to identifier name.
macro_rules! stringify_binding {
    ($name: ident as $err:expr) => {
        $err
    };
    ($name: ident) => {
        stringify!($name)
    };
}

/// Generate expression that evaluates to tuple of values
/// parsed from a `&mut ByteOrdered` reader.
macro_rules! parse_from_reader {
    ($rdr: expr, $errh: expr, $( $ty:ty $(as $ty2:ty)? => $err:expr ),* $(,)?) => {{
        let rdr = $rdr;
        ($(
            crate::parse::with_context(
                <$ty as crate::parse::Parseable>::parse(&mut *rdr), || ($errh)($err)
            )? $(as $ty2)?
        ),*)
    }};
    ($rdr: expr, $( $ty:ty $(as $ty2:ty)? => $err:expr ),* $(,)?) => {{
        parse_from_reader!($rdr, |e| format!("field `{}`", e), $( $ty $(as $ty2)? => $err ),*)
    }};
}

pub(crate) trait Parseable: Sized {
    fn parse<T: ReadBytesExt, E: Endian>(r: &mut ByteOrdered<T, E>) -> io::Result<Self>;
}

/// Prefix an IO error with the name of the field being read.
pub(crate) fn with_context<V, F, C>(res: io::Result<V>, ctx: F) -> io::Result<V>
where
    F: FnOnce() -> C,
    C: Display,
{
    res.map_err(|e| io::Error::new(e.kind(), format!("{}: {}", ctx(), e)))
}

macro_rules! impl_parseable {
    ($ty:ty, $method:ident) => {
        impl Parseable for $ty {
            fn parse<T: ReadBytesExt, E: Endian>(r: &mut ByteOrdered<T, E>) -> io::Result<Self> {
                r.$method()
            }
        }
    };
}

impl_parseable!(u8, read_u8);
impl_parseable!(u16, read_u16);
impl_parseable!(u32, read_u32);
impl_parseable!(f32, read_f32);
