use crate::config::Network;
use crate::primitives::{BlockHash, BlockNumber};

#[derive(PartialEq, Debug, Clone)]
pub struct Block {
    pub number: BlockNumber,
    timestamp: i64,
    pub extrinsics: Vec<BlockHash>,
    pub parent_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    /// The genesis parent hash is derived from the chain name so every
    /// network starts from a distinct genesis hash.
    pub fn genesis(network: Network) -> Self {
        let mut block = Self {
            number: 0,
            timestamp: 0,
            extrinsics: vec![],
            parent_hash: BlockHash::digest(network.chain_name()),
            hash: BlockHash::default(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn new(number: BlockNumber, extrinsics: Vec<BlockHash>, parent_hash: BlockHash) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut block = Self {
            number,
            timestamp,
            extrinsics,
            parent_hash,
            hash: BlockHash::default(),
        };
        block.hash = block.calculate_hash();
        block
    }

    fn calculate_hash(&self) -> BlockHash {
        let extrinsics: Vec<String> = self.extrinsics.iter().map(|e| e.to_string()).collect();
        let input = format!(
            "{}{}{}{}",
            self.number,
            self.timestamp,
            extrinsics.concat(),
            self.parent_hash
        );
        BlockHash::digest(input)
    }
}

/// Instant-seal chain: every sealed block can be finalized right away.
pub struct Chain {
    genesis: Block,
    blocks: Vec<Block>,
    finalized: BlockNumber,
}

impl Chain {
    pub fn new(network: Network) -> Self {
        Self {
            genesis: Block::genesis(network),
            blocks: vec![],
            finalized: 0,
        }
    }

    pub fn genesis_hash(&self) -> BlockHash {
        self.genesis.hash
    }

    pub fn best(&self) -> &Block {
        self.blocks.last().unwrap_or(&self.genesis)
    }

    pub fn block(&self, number: BlockNumber) -> Option<&Block> {
        match number {
            0 => Some(&self.genesis),
            n => self.blocks.get(n as usize - 1),
        }
    }

    pub fn seal_block(&mut self, extrinsics: Vec<BlockHash>) -> &Block {
        let parent = self.best();
        let block = Block::new(parent.number + 1, extrinsics, parent.hash);
        tracing::debug!(block.number, %block.hash, "Sealed block");
        self.blocks.push(block);
        self.best()
    }

    /// Finalizes the block with `hash` and all of its ancestors.
    pub fn finalize(&mut self, hash: &BlockHash) -> bool {
        let Some(block) = self.blocks.iter().find(|b| &b.hash == hash) else {
            return false;
        };
        if block.number > self.finalized {
            self.finalized = block.number;
            tracing::debug!(finalized = self.finalized, "Finalized block");
        }
        true
    }

    pub fn finalized_head(&self) -> BlockHash {
        self.block(self.finalized)
            .map(|block| block.hash)
            .unwrap_or(self.genesis.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chain_starts_at_genesis() {
        let chain = Chain::new(Network::Astar);
        assert_eq!(chain.best(), &Block::genesis(Network::Astar));
        assert_eq!(chain.finalized_head(), chain.genesis_hash());
    }

    #[test]
    fn genesis_differs_per_network() {
        let hashes: Vec<_> = Network::ALL
            .iter()
            .map(|network| Chain::new(*network).genesis_hash())
            .collect();
        assert_ne!(hashes[0], hashes[1]);
        assert_ne!(hashes[1], hashes[2]);
        assert_ne!(hashes[0], hashes[2]);
    }

    #[test]
    fn seal_block_links_to_parent() {
        let mut chain = Chain::new(Network::Shibuya);
        let genesis_hash = chain.genesis_hash();

        let block = chain.seal_block(vec![BlockHash::digest("tx")]).clone();

        assert_eq!(block.number, 1);
        assert_eq!(block.parent_hash, genesis_hash);
        assert_eq!(chain.block(1), Some(&block));

        let next = chain.seal_block(vec![]).clone();
        assert_eq!(next.parent_hash, block.hash);
        assert_eq!(chain.best(), &next);
    }

    #[test]
    fn finalize_moves_finalized_head() {
        let mut chain = Chain::new(Network::Shiden);
        let first = chain.seal_block(vec![]).hash;
        let second = chain.seal_block(vec![]).hash;

        assert!(chain.finalize(&second));
        assert_eq!(chain.finalized_head(), second);

        assert!(chain.finalize(&first));
        assert_eq!(chain.finalized_head(), second);
    }

    #[test]
    fn finalize_unknown_block_is_ignored() {
        let mut chain = Chain::new(Network::Astar);
        assert!(!chain.finalize(&BlockHash::digest("unknown")));
        assert_eq!(chain.finalized_head(), chain.genesis_hash());
    }
}
