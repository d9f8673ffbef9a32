use std::collections::HashMap;

use super::reflect::{UniformBlock, UniformKind};

/// Value accepted by [`ShaderProgram::set_uniform`](super::ShaderProgram::set_uniform).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    /// Stored as `1`/`0` in an integer uniform.
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec4([f32; 4]),
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

/// Resolved position of a uniform inside a program's staging memory.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    /// Index into the program's uniform blocks (not the shader binding).
    pub block: usize,
    pub offset: u32,
    pub kind: UniformKind,
}

/// Outcome of a uniform write.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum UniformWrite {
    Written,
    Unknown,
    Mismatch(UniformKind),
}

#[derive(Debug)]
struct BlockData {
    binding: u32,
    bytes: Vec<u8>,
    dirty: bool,
}

/// CPU-side uniform staging for one program.
///
/// Holds one byte buffer per uniform block, mirrors the GPU buffers, and
/// caches name → location lookups so the per-frame path does not rescan the
/// reflected layout.
#[derive(Debug)]
pub(crate) struct UniformStore {
    layout: Vec<UniformBlock>,
    blocks: Vec<BlockData>,
    locations: HashMap<String, Option<UniformLocation>>,
}

impl UniformStore {
    pub(crate) fn new(layout: Vec<UniformBlock>) -> Self {
        let blocks = layout
            .iter()
            .map(|b| BlockData {
                binding: b.binding,
                bytes: vec![0; buffer_size(b.size) as usize],
                dirty: false,
            })
            .collect();

        Self {
            layout,
            blocks,
            locations: HashMap::new(),
        }
    }

    pub(crate) fn layout(&self) -> &[UniformBlock] {
        &self.layout
    }

    /// Resolves `name`, consulting the reflected layout only on first use.
    pub(crate) fn location(&mut self, name: &str) -> Option<UniformLocation> {
        if let Some(cached) = self.locations.get(name) {
            return *cached;
        }

        let found = self.lookup(name);
        self.locations.insert(name.to_string(), found);
        found
    }

    /// Uncached lookup; first block declaring the name wins.
    pub(crate) fn lookup(&self, name: &str) -> Option<UniformLocation> {
        self.layout.iter().enumerate().find_map(|(block, b)| {
            b.members
                .iter()
                .find(|m| m.name == name)
                .map(|m| UniformLocation {
                    block,
                    offset: m.offset,
                    kind: m.kind,
                })
        })
    }

    pub(crate) fn set(&mut self, name: &str, value: UniformValue) -> UniformWrite {
        let Some(loc) = self.location(name) else {
            return UniformWrite::Unknown;
        };

        let written = match (loc.kind, value) {
            (UniformKind::Float, UniformValue::Float(v)) => self.put(loc, bytemuck::bytes_of(&v)),
            (UniformKind::Int, UniformValue::Int(v)) => self.put(loc, bytemuck::bytes_of(&v)),
            (UniformKind::Int, UniformValue::Bool(b)) => {
                self.put(loc, bytemuck::bytes_of(&i32::from(b)))
            }
            (UniformKind::Uint, UniformValue::Bool(b)) => {
                self.put(loc, bytemuck::bytes_of(&u32::from(b)))
            }
            (UniformKind::Uint, UniformValue::Int(v)) if v >= 0 => {
                self.put(loc, bytemuck::bytes_of(&(v as u32)))
            }
            (UniformKind::Vec4, UniformValue::Vec4(v)) => self.put(loc, bytemuck::cast_slice(&v)),
            _ => false,
        };

        if written {
            UniformWrite::Written
        } else {
            UniformWrite::Mismatch(loc.kind)
        }
    }

    /// Reads back the staged value. Unsigned values are reported as `Int`.
    pub(crate) fn get(&self, name: &str) -> Option<UniformValue> {
        let loc = self.locations.get(name).copied().flatten().or_else(|| self.lookup(name))?;
        let bytes = &self.blocks.get(loc.block)?.bytes;
        let at = |len: usize| bytes.get(loc.offset as usize..loc.offset as usize + len);

        match loc.kind {
            UniformKind::Float => at(4).map(|b| UniformValue::Float(bytemuck::pod_read_unaligned(b))),
            UniformKind::Int => at(4).map(|b| UniformValue::Int(bytemuck::pod_read_unaligned(b))),
            UniformKind::Uint => at(4).map(|b| {
                UniformValue::Int(bytemuck::pod_read_unaligned::<u32>(b) as i32)
            }),
            UniformKind::Vec4 => at(16).map(|b| UniformValue::Vec4(bytemuck::pod_read_unaligned(b))),
            UniformKind::Other => None,
        }
    }

    /// Hands every modified block to `write` and clears its dirty flag.
    pub(crate) fn flush_with(&mut self, mut write: impl FnMut(usize, &[u8])) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            if block.dirty {
                write(i, &block.bytes);
                block.dirty = false;
            }
        }
    }

    pub(crate) fn binding(&self, block: usize) -> Option<u32> {
        self.blocks.get(block).map(|b| b.binding)
    }

    pub(crate) fn block_len(&self, block: usize) -> Option<u64> {
        self.blocks.get(block).map(|b| b.bytes.len() as u64)
    }

    fn put(&mut self, loc: UniformLocation, src: &[u8]) -> bool {
        let Some(block) = self.blocks.get_mut(loc.block) else { return false };
        let start = loc.offset as usize;
        let Some(dst) = block.bytes.get_mut(start..start + src.len()) else { return false };

        dst.copy_from_slice(src);
        block.dirty = true;
        true
    }
}

/// GPU buffer size for a block: rounded up to 16 bytes, never zero.
pub(crate) fn buffer_size(block_size: u32) -> u32 {
    block_size.max(1).next_multiple_of(16)
}
