//! Build-by-connect, depth-first codebook extraction, pre-order
//! serialize/deserialize, and the stateful decode walk.

use std::io::{Read, Seek, SeekFrom, Write};
use crate::bit_vector::read_exact_short;
use crate::element::{Arena, Node, NodeId};
use crate::frequency_list::FrequencyList;
use crate::Error;

/// A codebook maps each byte value to its codeword, as a string of `'0'`s
/// and `'1'`s. A dense array is used since the key space (one byte) is
/// small and fully known.
pub type Codebook = [Option<String>; 256];

#[derive(Debug)]
pub struct HuffmanTree {
    arena: Arena,
    root: Option<NodeId>,
    count: u64,
    parsed: bool,
}

impl HuffmanTree {
    /// Folds `list` down to a single root by repeatedly extracting the two
    /// smallest entries, connecting them under a freshly merged internal
    /// node, and reinserting that node. A list with exactly one entry (a
    /// single distinct input byte) is rejected outright: there is no merge
    /// to perform and no prefix-free codeword to assign it.
    pub fn build(list: FrequencyList) -> Result<Self, Error> {
        if list.count() == 1 {
            return Err(Error::SingleSymbolInput);
        }
        let mut list = list;
        while list.count() >= 2 {
            let (a, b) = list.extract_two_minima()?;
            let combined = list.node(a).frequency + list.node(b).frequency;
            let p = list.add_or_increment(crate::element::SENTINEL, combined);
            list.connect(p, a, b);
        }
        let (arena, root) = list.into_parts();
        Ok(Self {
            arena,
            root,
            count: 0,
            parsed: false,
        })
    }

    /// An empty tree, used for zero-length input. Already considered
    /// "parsed" since it has no nodes to visit.
    pub fn empty() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            count: 0,
            parsed: true,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Depth-first, left-before-right traversal producing the codebook and
    /// recomputing `count` from the nodes actually visited.
    pub fn parse(&mut self) -> Result<Codebook, Error> {
        let root = match self.root {
            Some(r) => r,
            None => {
                self.count = 0;
                self.parsed = true;
                return Ok(std::array::from_fn(|_| None));
            }
        };
        let mut codebook: Codebook = std::array::from_fn(|_| None);
        let mut buf = String::new();
        let mut count = 0u64;
        visit(&self.arena, root, &mut buf, &mut codebook, &mut count);
        self.count = count;
        self.parsed = true;
        Ok(codebook)
    }

    /// Writes a little-endian 64-bit node count followed by the pre-order
    /// `(byte, is_leaf)` pairs. Returns the offset past the final node.
    pub fn serialize<W: Write + Seek>(&self, sink: &mut W, offset: u64) -> Result<u64, Error> {
        if !self.parsed {
            return Err(Error::InvalidState("cannot serialize an unparsed tree"));
        }
        sink.seek(SeekFrom::Start(offset))?;
        sink.write_all(&self.count.to_le_bytes())?;
        if let Some(root) = self.root {
            write_node(&self.arena, sink, root)?;
        }
        Ok(offset + 8 + 2 * self.count)
    }

    /// Reads the node count, then reconstructs the tree with an explicit
    /// recursive reader over a single advancing cursor: no offset
    /// arithmetic is needed to find a node's children, since the reader
    /// consumes exactly as many bytes as the subtree it is parsing.
    pub fn deserialize<R: Read + Seek>(source: &mut R, offset: u64) -> Result<Self, Error> {
        source.seek(SeekFrom::Start(offset))?;
        let mut count_buf = [0u8; 8];
        read_exact_short(source, &mut count_buf)?;
        let count = u64::from_le_bytes(count_buf);
        if count == 0 {
            return Ok(Self::empty());
        }
        let mut arena = Arena::new();
        let root = read_node(source, &mut arena)?;
        Ok(Self {
            arena,
            root: Some(root),
            count,
            parsed: true,
        })
    }

    /// Moves `cursor` to its left child on opcode 0, right child on 1. If
    /// the child reached is a leaf, its byte is emitted and the cursor
    /// resets to the root; otherwise nothing is emitted.
    pub fn state_step(&self, cursor: NodeId, opcode: u8) -> Result<(NodeId, Option<u8>), Error> {
        if opcode > 1 {
            return Err(Error::InvalidArgument("decode opcode must be 0 or 1"));
        }
        let node = self.arena.get(cursor);
        let child = if opcode == 0 { node.left } else { node.right };
        let child = child.ok_or(Error::InvalidArgument("decode cursor has no such child"))?;
        let child_node = self.arena.get(child);
        if child_node.is_leaf {
            let root = self.root.ok_or(Error::InvalidState("decode walk requires a root"))?;
            Ok((root, Some(child_node.byte)))
        } else {
            Ok((child, None))
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }
}

fn visit(arena: &Arena, id: NodeId, buf: &mut String, codebook: &mut Codebook, count: &mut u64) {
    *count += 1;
    let node = arena.get(id);
    if node.is_leaf {
        codebook[node.byte as usize] = Some(buf.clone());
        return;
    }
    buf.push('0');
    if let Some(l) = node.left {
        visit(arena, l, buf, codebook, count);
    }
    buf.pop();
    buf.push('1');
    if let Some(r) = node.right {
        visit(arena, r, buf, codebook, count);
    }
    buf.pop();
}

fn write_node<W: Write>(arena: &Arena, sink: &mut W, id: NodeId) -> Result<(), Error> {
    let node = arena.get(id);
    sink.write_all(&[node.byte, node.is_leaf as u8])?;
    if !node.is_leaf {
        write_node(arena, sink, node.left.expect("internal node has a left child"))?;
        write_node(arena, sink, node.right.expect("internal node has a right child"))?;
    }
    Ok(())
}

fn read_node<R: Read>(source: &mut R, arena: &mut Arena) -> Result<NodeId, Error> {
    let mut header = [0u8; 2];
    read_exact_short(source, &mut header)?;
    let byte = header[0];
    let is_leaf = header[1] != 0;
    if is_leaf {
        Ok(arena.insert(Node::leaf(byte, 0)))
    } else {
        let id = arena.insert(Node::internal(0));
        let left = read_node(source, arena)?;
        let right = read_node(source, arena)?;
        arena.get_mut(id).left = Some(left);
        arena.get_mut(id).right = Some(right);
        Ok(id)
    }
}
