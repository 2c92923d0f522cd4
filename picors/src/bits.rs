//! Conversions between Rust types and the packed bitfields found in
//! memory-mapped registers.
//!
//! Register contents are modeled as newtypes around `u32` (see
//! `bit_wrappers!`), with typed getters and builder-style setters generated by
//! `bitfield_accessors!`.  Multi-bit fields that map onto a closed set of
//! values use `bit_enums!`.

/// Some bits read from the hardware weren't valid for the expected type.  This
/// usually indicates a driver bug, but can also indicate misbehaving hardware.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BadBits(pub u32);

/// Result type for `BadBits`.
pub type BitsResult<T> = Result<T, BadBits>;

/// Construct `Self` from a small bitwise representation, without assuming that
/// every possible bit pattern can be represented.
pub trait FromBits: Sized {
    /// Returns `BadBits` if `bits` is not a valid encoding of `Self`.
    fn from_bits(bits: u32) -> BitsResult<Self>;
}

/// Construct `Self` from a small bitwise representation where every bit
/// pattern the field can hold is valid.
pub trait FromBitsTotal {
    fn from_bits_total(bits: u32) -> Self;
}

/// Converts `self` into a small bitwise representation.  Should not panic.
pub trait IntoBits {
    fn into_bits(self) -> u32;
}

impl FromBits for bool {
    fn from_bits(bits: u32) -> BitsResult<Self> {
        match bits {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(BadBits(bits)),
        }
    }
}

/// Only used on single-bit fields, which cannot hold anything but 0 or 1.
impl FromBitsTotal for bool {
    fn from_bits_total(bits: u32) -> Self {
        bits != 0
    }
}

impl FromBitsTotal for u32 {
    fn from_bits_total(bits: u32) -> Self {
        bits
    }
}

impl IntoBits for bool {
    fn into_bits(self) -> u32 {
        u32::from(self)
    }
}

impl IntoBits for u32 {
    fn into_bits(self) -> u32 {
        self
    }
}

/// Associates a wrapped bits type with its underlying `Raw` type.
pub trait BitsWrapper {
    type Raw;

    fn from_raw(v: Self::Raw) -> Self;
}

#[inline(always)]
const fn field_mask(hi: usize, lo: usize) -> u32 {
    let width = hi - lo + 1;
    if width < 32 {
        (1 << width) - 1
    } else {
        !0
    }
}

/// Given a value `v`, extracts bits `hi` through `lo` (inclusive).
#[inline(always)]
pub const fn bitfield_extract(v: u32, hi: usize, lo: usize) -> u32 {
    (v >> lo) & field_mask(hi, lo)
}

/// Given a value `orig`, replaces bits `hi` through `lo` (inclusive) with the
/// same number of low-order bits from `new`.
#[inline(always)]
pub const fn bitfield_replace(orig: u32, hi: usize, lo: usize, new: u32) -> u32 {
    let mask = field_mask(hi, lo);
    (orig & !(mask << lo)) | ((new & mask) << lo)
}

/// Declares wrapped bits types, written like a newtype around an integer:
///
/// ```ignore
/// bit_wrappers! {
///     pub struct Csr(pub u32);
/// }
/// ```
///
/// Derives `Copy`, `Clone`, `Eq`, `PartialEq`, `Debug` and `BitsWrapper`.
macro_rules! bit_wrappers {
    () => {};
    ($(#[$m:meta])* pub struct $name:ident(pub $ty:ty); $($rest:tt)*) => {
        #[derive(Copy, Clone, Eq, PartialEq, Debug)]
        $(#[$m])*
        pub struct $name(pub $ty);

        impl $crate::bits::BitsWrapper for $name {
            type Raw = $ty;

            fn from_raw(v: Self::Raw) -> Self {
                $name(v)
            }
        }

        bit_wrappers!{$($rest)*}
    };
}

/// Declares accessors for packed bitfields inside an `impl` block for a
/// `BitsWrapper` type:
///
/// ```ignore
/// pub total [16] get_countflag / with_countflag: bool,
/// pub       [5:4] get_drive / with_drive: DriveStrength,
/// ```
///
/// Each line gives the bit range (a single index, or `hi:lo` inclusive), the
/// getter and builder names, and the field type.  Fields marked `total` return
/// the type directly and rely on `FromBitsTotal`; the rest return
/// `BitsResult<T>` through `FromBits`, so that a bad encoding read back from
/// hardware surfaces as `BadBits` rather than a panic.
macro_rules! bitfield_accessors {
    () => {};

    (
        $(#[$m:meta])*
        pub [$bit:tt] $get:ident / $with:ident : $ty:ty,
        $($rest:tt)*
    ) => {
        bitfield_accessors! {
            @_impl $(#[$m])* partial [$bit : $bit] $get / $with : $ty
        }
        bitfield_accessors!{ $($rest)* }
    };

    (
        $(#[$m:meta])*
        pub total [$bit:tt] $get:ident / $with:ident : $ty:ty,
        $($rest:tt)*
    ) => {
        bitfield_accessors! {
            @_impl $(#[$m])* total [$bit : $bit] $get / $with : $ty
        }
        bitfield_accessors!{ $($rest)* }
    };

    (
        $(#[$m:meta])*
        pub [$hi:tt : $lo:tt] $get:ident / $with:ident : $ty:ty,
        $($rest:tt)*
    ) => {
        bitfield_accessors! {
            @_impl $(#[$m])* partial [$hi : $lo] $get / $with : $ty
        }
        bitfield_accessors!{ $($rest)* }
    };

    (
        $(#[$m:meta])*
        pub total [$hi:tt : $lo:tt] $get:ident / $with:ident : $ty:ty,
        $($rest:tt)*
    ) => {
        bitfield_accessors! {
            @_impl $(#[$m])* total [$hi : $lo] $get / $with : $ty
        }
        bitfield_accessors!{ $($rest)* }
    };

    (
        @_impl $(#[$m:meta])* partial [$hi:tt : $lo:tt]
        $get:ident / $with:ident : $ty:ty
    ) => {
        $(#[$m])*
        #[inline]
        pub fn $get(self) -> $crate::bits::BitsResult<$ty> {
            <$ty as $crate::bits::FromBits>::from_bits(
                $crate::bits::bitfield_extract(self.0, $hi, $lo))
        }

        $(#[$m])*
        #[inline]
        pub fn $with(self, v: $ty) -> Self {
            $crate::bits::BitsWrapper::from_raw(
                $crate::bits::bitfield_replace(
                    self.0, $hi, $lo,
                    <$ty as $crate::bits::IntoBits>::into_bits(v)))
        }
    };

    (
        @_impl $(#[$m:meta])* total [$hi:tt : $lo:tt]
        $get:ident / $with:ident : $ty:ty
    ) => {
        $(#[$m])*
        #[inline]
        pub fn $get(self) -> $ty {
            <$ty as $crate::bits::FromBitsTotal>::from_bits_total(
                $crate::bits::bitfield_extract(self.0, $hi, $lo))
        }

        $(#[$m])*
        #[inline]
        pub fn $with(self, v: $ty) -> Self {
            $crate::bits::BitsWrapper::from_raw(
                $crate::bits::bitfield_replace(
                    self.0, $hi, $lo,
                    <$ty as $crate::bits::IntoBits>::into_bits(v)))
        }
    };
}

/// Declares enums with a bidirectional mapping to small bit patterns.  Every
/// variant needs an explicit value:
///
/// ```ignore
/// bit_enums! {
///     pub bit_enum ClkSource {
///         External = 0,
///         Processor = 1,
///     }
/// }
/// ```
///
/// Derives `Copy`, `Clone`, `Eq`, `PartialEq`, `Debug`, `IntoBits` and
/// `FromBits`.
macro_rules! bit_enums {
    () => {};
    (
        $(#[$m:meta])*
        pub bit_enum $name:ident {
            $($(#[$em:meta])* $e_name:ident = $e_val:expr,)+
        }
        $($rest:tt)*
    ) => {
        #[derive(Copy, Clone, Eq, PartialEq, Debug)]
        $(#[$m])*
        pub enum $name {
            $($(#[$em])* $e_name = $e_val),+
        }

        impl $crate::bits::IntoBits for $name {
            fn into_bits(self) -> u32 {
                self as u32
            }
        }

        impl $crate::bits::FromBits for $name {
            fn from_bits(bits: u32) -> $crate::bits::BitsResult<Self> {
                match bits {
                    $(x if x == $e_val => Ok($name::$e_name),)+
                    _ => Err($crate::bits::BadBits(bits)),
                }
            }
        }

        bit_enums!{$($rest)*}
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    bit_wrappers! {
        pub struct Word(pub u32);
    }

    bit_enums! {
        pub bit_enum Mode {
            Off = 0b00,
            Slow = 0b01,
            Fast = 0b11,
        }
    }

    impl Word {
        bitfield_accessors! {
            pub total [31] get_top / with_top: bool,
            pub [9:8] get_mode / with_mode: Mode,
            pub total [7:0] get_low / with_low: u32,
        }
    }

    #[test]
    fn enum_fields_reject_unassigned_encodings() {
        let w = Word(0b10 << 8);
        assert_eq!(w.get_mode(), Err(BadBits(0b10)));
        assert_eq!(w.with_mode(Mode::Fast).get_mode(), Ok(Mode::Fast));
    }

    #[test]
    fn builders_leave_other_fields_alone() {
        let w = Word(0).with_low(0xAB).with_top(true).with_mode(Mode::Slow);
        assert_eq!(w.0, 0x8000_01AB);
        assert!(w.get_top());
        assert_eq!(w.with_top(false).0, 0x0000_01AB);
    }

    #[test]
    fn full_width_field_round_trips() {
        assert_eq!(bitfield_extract(0xDEAD_BEEF, 31, 0), 0xDEAD_BEEF);
        assert_eq!(bitfield_replace(0, 31, 0, 0x1234_5678), 0x1234_5678);
    }

    proptest! {
        #[test]
        fn replace_then_extract_yields_truncated_value(
            orig in any::<u32>(),
            lo in 0usize..32,
            width in 1usize..=32,
            new in any::<u32>(),
        ) {
            prop_assume!(lo + width <= 32);
            let hi = lo + width - 1;
            let mask = if width == 32 { !0 } else { (1u32 << width) - 1 };

            let v = bitfield_replace(orig, hi, lo, new);
            prop_assert_eq!(bitfield_extract(v, hi, lo), new & mask);
            // Bits outside the field are untouched.
            prop_assert_eq!(v & !(mask << lo), orig & !(mask << lo));
        }
    }
}
