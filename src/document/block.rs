//! Block arena for the raw document chain.
//!
//! A document is a linked chain of blocks, each holding a run of raw lines.
//! The parser splits the chain at every dictionary boundary so that a
//! dictionary's lines occupy whole blocks; replacing a dictionary then means
//! swapping one block's line list without touching its neighbors.
//!
//! Blocks live in an arena and reference their successor by index, with
//! `next` stored as an optional index instead of an owning pointer.

use std::io::{self, Write};

use super::line::RawLine;

/// Index of a block within its arena.
pub type BlockId = usize;

/// A run of consecutive raw lines.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Lines in file order.
    pub lines: Vec<RawLine>,
    next: Option<BlockId>,
}

/// Arena of blocks forming one chain, head first.
#[derive(Debug, Clone)]
pub struct BlockChain {
    blocks: Vec<Block>,
    head: BlockId,
    tail: BlockId,
}

impl BlockChain {
    /// Create a chain holding a single empty block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::default()],
            head: 0,
            tail: 0,
        }
    }

    /// The block currently at the end of the chain.
    pub fn tail(&self) -> BlockId {
        self.tail
    }

    /// Append a fresh block after the current tail and return its id.
    pub fn push_block(&mut self) -> BlockId {
        let id = self.blocks.len();
        self.blocks.push(Block {
            lines: Vec::new(),
            next: None,
        });
        self.blocks[self.tail].next = Some(id);
        self.tail = id;
        id
    }

    /// Append a line to the block at `id`.
    pub fn push_line(&mut self, id: BlockId, line: RawLine) {
        self.blocks[id].lines.push(line);
    }

    /// Lines of the block at `id`.
    pub fn lines(&self, id: BlockId) -> &[RawLine] {
        &self.blocks[id].lines
    }

    /// Mutable access to one line.
    pub fn line_mut(&mut self, id: BlockId, index: usize) -> &mut RawLine {
        &mut self.blocks[id].lines[index]
    }

    /// Mutable access to the most recently appended line of a block, if any.
    pub fn last_line_mut(&mut self, id: BlockId) -> Option<&mut RawLine> {
        self.blocks[id].lines.last_mut()
    }

    /// Replace the whole line list of the block at `id`.
    pub fn set_lines(&mut self, id: BlockId, lines: Vec<RawLine>) {
        self.blocks[id].lines = lines;
    }

    /// Walk the chain head to tail, serializing every line verbatim.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let mut current = Some(self.head);
        while let Some(id) = current {
            let block = &self.blocks[id];
            for line in &block.lines {
                line.serialize(writer)?;
            }
            current = block.next;
        }
        Ok(())
    }
}

impl Default for BlockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> RawLine {
        RawLine::new(text.to_string())
    }

    #[test]
    fn test_serialize_walks_chain_in_order() {
        let mut chain = BlockChain::new();
        chain.push_line(chain.tail(), line("a"));
        let b1 = chain.push_block();
        chain.push_line(b1, line("b"));
        let b2 = chain.push_block();
        chain.push_line(b2, line("c"));
        chain.push_line(b2, line("d"));

        let mut buf = Vec::new();
        chain.serialize(&mut buf).unwrap();
        assert_eq!(buf, b"a\nb\nc\nd\n");
    }

    #[test]
    fn test_replacing_block_lines_leaves_neighbors_alone() {
        let mut chain = BlockChain::new();
        chain.push_line(chain.tail(), line("before"));
        let middle = chain.push_block();
        chain.push_line(middle, line("old"));
        let after = chain.push_block();
        chain.push_line(after, line("after"));

        chain.set_lines(middle, vec![line("new 1"), line("new 2")]);

        let mut buf = Vec::new();
        chain.serialize(&mut buf).unwrap();
        assert_eq!(buf, b"before\nnew 1\nnew 2\nafter\n");
    }

    #[test]
    fn test_empty_block_serializes_nothing() {
        let mut chain = BlockChain::new();
        chain.push_line(chain.tail(), line("x"));
        chain.push_block();

        let mut buf = Vec::new();
        chain.serialize(&mut buf).unwrap();
        assert_eq!(buf, b"x\n");
    }
}
