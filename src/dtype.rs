//! Primitive type descriptors and strided buffer access (spec §4.A).
//!
//! A [`DataType`] is the sole authority for interpreting a byte region as a
//! sequence of primitives; no other component assumes contiguity. The byte
//! index of logical element `i` is always `offset_bytes + i * stride_bytes`.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::TreeError;

/// The primitive kind a [`DataType`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// No element kind; a bare descriptor with `count == 0`.
    None,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 32-bit IEEE-754 float.
    F32,
    /// 64-bit IEEE-754 float.
    F64,
    /// Single byte interpreted as a character.
    Char8,
}

impl ElementKind {
    /// The natural width, in bytes, of one element of this kind.
    pub const fn element_bytes(self) -> usize {
        match self {
            ElementKind::None => 0,
            ElementKind::U8 | ElementKind::I8 | ElementKind::Char8 => 1,
            ElementKind::U16 | ElementKind::I16 => 2,
            ElementKind::U32 | ElementKind::I32 | ElementKind::F32 => 4,
            ElementKind::U64 | ElementKind::I64 | ElementKind::F64 => 8,
        }
    }

    /// Returns `true` for the integer kinds (signed or unsigned).
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ElementKind::U8
                | ElementKind::U16
                | ElementKind::U32
                | ElementKind::U64
                | ElementKind::I8
                | ElementKind::I16
                | ElementKind::I32
                | ElementKind::I64
        )
    }

    /// Returns `true` for the floating-point kinds.
    pub const fn is_float(self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }

    /// Returns `true` if this kind is unsigned.
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            ElementKind::U8 | ElementKind::U16 | ElementKind::U32 | ElementKind::U64
        )
    }

    /// Parse the textual name used by the schema-string grammar (spec §6).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "u8" => ElementKind::U8,
            "u16" => ElementKind::U16,
            "u32" => ElementKind::U32,
            "u64" => ElementKind::U64,
            "i8" => ElementKind::I8,
            "i16" => ElementKind::I16,
            "i32" => ElementKind::I32,
            "i64" => ElementKind::I64,
            "f32" => ElementKind::F32,
            "f64" => ElementKind::F64,
            "char8" => ElementKind::Char8,
            "none" => ElementKind::None,
            _ => return None,
        })
    }

    /// The textual name used by the schema-string grammar (spec §6).
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::None => "none",
            ElementKind::U8 => "u8",
            ElementKind::U16 => "u16",
            ElementKind::U32 => "u32",
            ElementKind::U64 => "u64",
            ElementKind::I8 => "i8",
            ElementKind::I16 => "i16",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
            ElementKind::Char8 => "char8",
        }
    }
}

/// Byte order used to interpret multi-byte elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least-significant byte first (the host-native order on every
    /// platform this crate targets).
    Little,
    /// Most-significant byte first.
    Big,
}

impl Endianness {
    /// The endianness of the machine this code is compiled for.
    pub const fn native() -> Self {
        #[cfg(target_endian = "little")]
        {
            Endianness::Little
        }
        #[cfg(target_endian = "big")]
        {
            Endianness::Big
        }
    }
}

/// A strided, typed view over a byte region (spec §3, §4.A).
///
/// `DataType` is a pure value: it never owns or borrows the bytes it
/// describes. [`crate::BufferOwner`] supplies the bytes; `DataType` only
/// says how to read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataType {
    kind: ElementKind,
    count: usize,
    stride_bytes: usize,
    offset_bytes: usize,
    element_bytes: usize,
    endianness: Endianness,
}

impl DataType {
    /// A bare descriptor with no elements: `kind = None, count = 0`.
    ///
    /// Returned by [`crate::Node::dtype`] when called on an object node
    /// (spec §4.C).
    pub const fn empty() -> Self {
        DataType {
            kind: ElementKind::None,
            count: 0,
            stride_bytes: 0,
            offset_bytes: 0,
            element_bytes: 0,
            endianness: Endianness::Little,
        }
    }

    /// Build the default, compact descriptor for `kind` and `count`:
    /// `offset = 0`, `stride = element_bytes`, native endianness.
    pub fn compact(kind: ElementKind, count: usize) -> Self {
        let element_bytes = kind.element_bytes();
        DataType {
            kind,
            count,
            stride_bytes: element_bytes,
            offset_bytes: 0,
            element_bytes,
            endianness: Endianness::native(),
        }
    }

    /// Default compact `u8` descriptor of the given length.
    pub fn u8(count: usize) -> Self {
        Self::compact(ElementKind::U8, count)
    }
    /// Default compact `u16` descriptor of the given length.
    pub fn u16(count: usize) -> Self {
        Self::compact(ElementKind::U16, count)
    }
    /// Default compact `u32` descriptor of the given length.
    pub fn u32(count: usize) -> Self {
        Self::compact(ElementKind::U32, count)
    }
    /// Default compact `u64` descriptor of the given length.
    pub fn u64(count: usize) -> Self {
        Self::compact(ElementKind::U64, count)
    }
    /// Default compact `i8` descriptor of the given length.
    pub fn i8(count: usize) -> Self {
        Self::compact(ElementKind::I8, count)
    }
    /// Default compact `i16` descriptor of the given length.
    pub fn i16(count: usize) -> Self {
        Self::compact(ElementKind::I16, count)
    }
    /// Default compact `i32` descriptor of the given length.
    pub fn i32(count: usize) -> Self {
        Self::compact(ElementKind::I32, count)
    }
    /// Default compact `i64` descriptor of the given length.
    pub fn i64(count: usize) -> Self {
        Self::compact(ElementKind::I64, count)
    }
    /// Default compact `f32` descriptor of the given length.
    pub fn f32(count: usize) -> Self {
        Self::compact(ElementKind::F32, count)
    }
    /// Default compact `f64` descriptor of the given length.
    pub fn f64(count: usize) -> Self {
        Self::compact(ElementKind::F64, count)
    }

    /// Build a fully explicit descriptor (used by the schema-string parser
    /// and by `set(void*, DataType)`-style non-owning leaves).
    #[allow(clippy::too_many_arguments)]
    pub fn with_layout(
        kind: ElementKind,
        count: usize,
        offset_bytes: usize,
        stride_bytes: usize,
        element_bytes: usize,
        endianness: Endianness,
    ) -> Self {
        DataType {
            kind,
            count,
            offset_bytes,
            stride_bytes,
            element_bytes,
            endianness,
        }
    }

    /// The element kind.
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The number of logical elements this descriptor spans.
    pub const fn number_of_elements(&self) -> usize {
        self.count
    }

    /// The byte offset of the first element.
    pub const fn offset_bytes(&self) -> usize {
        self.offset_bytes
    }

    /// The byte distance between consecutive elements.
    pub const fn stride_bytes(&self) -> usize {
        self.stride_bytes
    }

    /// The width, in bytes, of one element as actually stored (may differ
    /// from `kind.element_bytes()` for a packed/reinterpreted view).
    pub const fn element_bytes(&self) -> usize {
        self.element_bytes
    }

    /// The endianness used to decode multi-byte elements.
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The number of bytes a fully compact (`stride == element_bytes`,
    /// `offset == 0`) buffer of `count` elements of this kind would occupy.
    pub const fn bytes_compact(&self) -> usize {
        self.count * self.element_bytes
    }

    /// `true` if this descriptor addresses a contiguous, zero-offset
    /// region (`stride == element_bytes && offset == 0`).
    pub const fn is_compact(&self) -> bool {
        self.stride_bytes == self.element_bytes && self.offset_bytes == 0
    }

    /// The byte index of logical element `i`: `offset + i * stride`.
    pub const fn element_index(&self, i: usize) -> usize {
        self.offset_bytes + i * self.stride_bytes
    }

    /// `true` if element `i` falls entirely inside a buffer of `buf_len`
    /// bytes.
    pub fn element_in_bounds(&self, i: usize, buf_len: usize) -> bool {
        i < self.count && self.element_index(i) + self.element_bytes <= buf_len
    }

    /// Borrow the byte slot for element `i`, bounds-checked against both
    /// the declared `count` and the buffer's actual length.
    pub fn read_checked<'b>(&self, buf: &'b [u8], i: usize) -> crate::Result<&'b [u8]> {
        if i >= self.count {
            return Err(TreeError::OutOfRange {
                index: i,
                len: self.count,
            });
        }
        let start = self.element_index(i);
        let end = start + self.element_bytes;
        buf.get(start..end).ok_or(TreeError::OutOfRange {
            index: i,
            len: self.count,
        })
    }

    /// Read element `i` as an `i64`, widening per `kind`. Used by
    /// [`crate::Node::to_integer`].
    pub fn read_as_i64(&self, buf: &[u8], i: usize) -> crate::Result<i64> {
        let slot = self.read_checked(buf, i)?;
        Ok(match (self.kind, self.endianness) {
            (ElementKind::U8 | ElementKind::Char8, _) => i64::from(slot[0]),
            (ElementKind::I8, _) => i64::from(slot[0] as i8),
            (ElementKind::U16, Endianness::Little) => i64::from(LittleEndian::read_u16(slot)),
            (ElementKind::U16, Endianness::Big) => i64::from(BigEndian::read_u16(slot)),
            (ElementKind::I16, Endianness::Little) => i64::from(LittleEndian::read_i16(slot)),
            (ElementKind::I16, Endianness::Big) => i64::from(BigEndian::read_i16(slot)),
            (ElementKind::U32, Endianness::Little) => i64::from(LittleEndian::read_u32(slot)),
            (ElementKind::U32, Endianness::Big) => i64::from(BigEndian::read_u32(slot)),
            (ElementKind::I32, Endianness::Little) => i64::from(LittleEndian::read_i32(slot)),
            (ElementKind::I32, Endianness::Big) => i64::from(BigEndian::read_i32(slot)),
            (ElementKind::U64, Endianness::Little) => LittleEndian::read_u64(slot) as i64,
            (ElementKind::U64, Endianness::Big) => BigEndian::read_u64(slot) as i64,
            (ElementKind::I64, Endianness::Little) => LittleEndian::read_i64(slot),
            (ElementKind::I64, Endianness::Big) => BigEndian::read_i64(slot),
            (ElementKind::F32, Endianness::Little) => LittleEndian::read_f32(slot) as i64,
            (ElementKind::F32, Endianness::Big) => BigEndian::read_f32(slot) as i64,
            (ElementKind::F64, Endianness::Little) => LittleEndian::read_f64(slot) as i64,
            (ElementKind::F64, Endianness::Big) => BigEndian::read_f64(slot) as i64,
            (ElementKind::None, _) => return Err(TreeError::NotALeaf),
        })
    }

    /// Read element `i` as an `f64`, widening per `kind`. Used by
    /// [`crate::Node::to_real`].
    pub fn read_as_f64(&self, buf: &[u8], i: usize) -> crate::Result<f64> {
        let slot = self.read_checked(buf, i)?;
        Ok(match (self.kind, self.endianness) {
            (ElementKind::U8 | ElementKind::Char8, _) => f64::from(slot[0]),
            (ElementKind::I8, _) => f64::from(slot[0] as i8),
            (ElementKind::U16, Endianness::Little) => f64::from(LittleEndian::read_u16(slot)),
            (ElementKind::U16, Endianness::Big) => f64::from(BigEndian::read_u16(slot)),
            (ElementKind::I16, Endianness::Little) => f64::from(LittleEndian::read_i16(slot)),
            (ElementKind::I16, Endianness::Big) => f64::from(BigEndian::read_i16(slot)),
            (ElementKind::U32, Endianness::Little) => f64::from(LittleEndian::read_u32(slot)),
            (ElementKind::U32, Endianness::Big) => f64::from(BigEndian::read_u32(slot)),
            (ElementKind::I32, Endianness::Little) => f64::from(LittleEndian::read_i32(slot)),
            (ElementKind::I32, Endianness::Big) => f64::from(BigEndian::read_i32(slot)),
            (ElementKind::U64, Endianness::Little) => LittleEndian::read_u64(slot) as f64,
            (ElementKind::U64, Endianness::Big) => BigEndian::read_u64(slot) as f64,
            (ElementKind::I64, Endianness::Little) => LittleEndian::read_i64(slot) as f64,
            (ElementKind::I64, Endianness::Big) => BigEndian::read_i64(slot) as f64,
            (ElementKind::F32, Endianness::Little) => f64::from(LittleEndian::read_f32(slot)),
            (ElementKind::F32, Endianness::Big) => f64::from(BigEndian::read_f32(slot)),
            (ElementKind::F64, Endianness::Little) => LittleEndian::read_f64(slot),
            (ElementKind::F64, Endianness::Big) => BigEndian::read_f64(slot),
            (ElementKind::None, _) => return Err(TreeError::NotALeaf),
        })
    }

    /// Write an `i64` into element `i`, narrowing per `kind`.
    ///
    /// Used when materializing compact/packed buffers (e.g.
    /// [`crate::O2MRelation::compact_to`]).
    pub fn write_from_i64(&self, buf: &mut [u8], i: usize, value: i64) -> crate::Result<()> {
        if i >= self.count {
            return Err(TreeError::OutOfRange {
                index: i,
                len: self.count,
            });
        }
        let start = self.element_index(i);
        let end = start + self.element_bytes;
        let slot = buf
            .get_mut(start..end)
            .ok_or(TreeError::OutOfRange { index: i, len: self.count })?;
        match (self.kind, self.endianness) {
            (ElementKind::U8 | ElementKind::Char8, _) => slot[0] = value as u8,
            (ElementKind::I8, _) => slot[0] = value as i8 as u8,
            (ElementKind::U16, Endianness::Little) => LittleEndian::write_u16(slot, value as u16),
            (ElementKind::U16, Endianness::Big) => BigEndian::write_u16(slot, value as u16),
            (ElementKind::I16, Endianness::Little) => LittleEndian::write_i16(slot, value as i16),
            (ElementKind::I16, Endianness::Big) => BigEndian::write_i16(slot, value as i16),
            (ElementKind::U32, Endianness::Little) => LittleEndian::write_u32(slot, value as u32),
            (ElementKind::U32, Endianness::Big) => BigEndian::write_u32(slot, value as u32),
            (ElementKind::I32, Endianness::Little) => LittleEndian::write_i32(slot, value as i32),
            (ElementKind::I32, Endianness::Big) => BigEndian::write_i32(slot, value as i32),
            (ElementKind::U64, Endianness::Little) => LittleEndian::write_u64(slot, value as u64),
            (ElementKind::U64, Endianness::Big) => BigEndian::write_u64(slot, value as u64),
            (ElementKind::I64, Endianness::Little) => LittleEndian::write_i64(slot, value),
            (ElementKind::I64, Endianness::Big) => BigEndian::write_i64(slot, value),
            (ElementKind::F32, Endianness::Little) => {
                LittleEndian::write_f32(slot, value as f32)
            },
            (ElementKind::F32, Endianness::Big) => BigEndian::write_f32(slot, value as f32),
            (ElementKind::F64, Endianness::Little) => {
                LittleEndian::write_f64(slot, value as f64)
            },
            (ElementKind::F64, Endianness::Big) => BigEndian::write_f64(slot, value as f64),
            (ElementKind::None, _) => return Err(TreeError::NotALeaf),
        }
        Ok(())
    }
}

/// A Rust primitive that corresponds 1:1 to an [`ElementKind`].
///
/// Bridges `Node::set(u32)`/`Node::set(f64)`-style overloads (spec §4.C)
/// onto the generic byte layer without one hand-written `set_*` per
/// primitive type.
pub trait Primitive: Copy + 'static {
    /// The [`ElementKind`] this Rust type corresponds to.
    const KIND: ElementKind;

    /// Widen to `i64` (used to build leaves through `DataType::write_from_i64`).
    fn to_i64(self) -> i64;
    /// Widen to `f64`.
    fn to_f64(self) -> f64;
    /// Decode one element of this type from its natural-width byte slot.
    fn from_bytes(slot: &[u8], endianness: Endianness) -> Self;
    /// Encode one element of this type into its natural-width byte slot.
    fn write_bytes(self, slot: &mut [u8], endianness: Endianness);
}

macro_rules! impl_primitive_int {
    ($($t:ty => $kind:ident, $read:ident, $write:ident),* $(,)?) => {
        $(
            impl Primitive for $t {
                const KIND: ElementKind = ElementKind::$kind;
                fn to_i64(self) -> i64 { self as i64 }
                fn to_f64(self) -> f64 { self as f64 }
                fn from_bytes(slot: &[u8], endianness: Endianness) -> Self {
                    match endianness {
                        Endianness::Little => LittleEndian::$read(slot),
                        Endianness::Big => BigEndian::$read(slot),
                    }
                }
                fn write_bytes(self, slot: &mut [u8], endianness: Endianness) {
                    match endianness {
                        Endianness::Little => LittleEndian::$write(slot, self),
                        Endianness::Big => BigEndian::$write(slot, self),
                    }
                }
            }
        )*
    };
}

impl Primitive for u8 {
    const KIND: ElementKind = ElementKind::U8;
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_bytes(slot: &[u8], _endianness: Endianness) -> Self {
        slot[0]
    }
    fn write_bytes(self, slot: &mut [u8], _endianness: Endianness) {
        slot[0] = self;
    }
}

impl Primitive for i8 {
    const KIND: ElementKind = ElementKind::I8;
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_bytes(slot: &[u8], _endianness: Endianness) -> Self {
        slot[0] as i8
    }
    fn write_bytes(self, slot: &mut [u8], _endianness: Endianness) {
        slot[0] = self as u8;
    }
}

impl_primitive_int!(
    u16 => U16, read_u16, write_u16,
    u32 => U32, read_u32, write_u32,
    u64 => U64, read_u64, write_u64,
    i16 => I16, read_i16, write_i16,
    i32 => I32, read_i32, write_i32,
    i64 => I64, read_i64, write_i64,
);

impl Primitive for f32 {
    const KIND: ElementKind = ElementKind::F32;
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
    fn from_bytes(slot: &[u8], endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => LittleEndian::read_f32(slot),
            Endianness::Big => BigEndian::read_f32(slot),
        }
    }
    fn write_bytes(self, slot: &mut [u8], endianness: Endianness) {
        match endianness {
            Endianness::Little => LittleEndian::write_f32(slot, self),
            Endianness::Big => BigEndian::write_f32(slot, self),
        }
    }
}

impl Primitive for f64 {
    const KIND: ElementKind = ElementKind::F64;
    fn to_i64(self) -> i64 {
        self as i64
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn from_bytes(slot: &[u8], endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => LittleEndian::read_f64(slot),
            Endianness::Big => BigEndian::read_f64(slot),
        }
    }
    fn write_bytes(self, slot: &mut [u8], endianness: Endianness) {
        match endianness {
            Endianness::Little => LittleEndian::write_f64(slot, self),
            Endianness::Big => BigEndian::write_f64(slot, self),
        }
    }
}
