use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;

/// The partial-sorting structure `D` from Lemma 3.3 of the paper.
///
/// It holds key/value pairs in two regions:
///
/// - the batch region, a deque of ascending-sorted batches produced by
///   [`batch_prepend`](Self::batch_prepend). Every batch only holds values no
///   larger than anything in the batches behind it.
/// - the block region, a sequence of unsorted blocks of at most `2M` pairs
///   filled by [`insert`](Self::insert). Blocks are ordered by their upper
///   bound, so every value in a block is no larger than any value in a later
///   block.
///
/// `key_values` holds the authoritative value of each key. Pairs in either
/// region that disagree with it are dead and get dropped whenever they are
/// scanned, so updating a key never has to search the regions.
///
/// - Insert: amortized O(log(N/M))
/// - BatchPrepend: O(L log L) for L pairs
/// - Pull: amortized O(M log M), only a bounded prefix of each region is read
#[derive(Debug)]
pub struct PartialSortingQueue<K, V>
where
    K: Eq + Hash + Ord + Copy + Debug,
    V: Ord + Copy + Debug,
{
    /// Pull granularity M
    capacity: usize,

    /// Ceiling B, returned as separator once the queue is empty
    upper_bound: V,

    /// Authoritative value per key
    key_values: HashMap<K, V>,

    /// Batch region, most recent batch first
    batches: VecDeque<VecDeque<(K, V)>>,

    /// Block region, ordered by upper bound
    blocks: VecDeque<Block<K, V>>,
}

#[derive(Debug, Clone)]
struct Block<K, V> {
    pairs: Vec<(K, V)>,
    upper_bound: V,
}

/// Which region a pulled candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Batch,
    Block,
}

impl<K, V> PartialSortingQueue<K, V>
where
    K: Eq + Hash + Ord + Copy + Debug,
    V: Ord + Copy + Debug,
{
    /// Creates an empty queue pulling at most `capacity` keys at a time, with
    /// every value expected to stay below `upper_bound`
    pub fn new(capacity: usize, upper_bound: V) -> Self {
        PartialSortingQueue {
            capacity: capacity.max(1),
            upper_bound,
            key_values: HashMap::new(),
            batches: VecDeque::new(),
            blocks: VecDeque::from(vec![Block {
                pairs: Vec::new(),
                upper_bound,
            }]),
        }
    }

    /// True iff no key has a live value
    pub fn is_empty(&self) -> bool {
        self.key_values.is_empty()
    }

    /// Number of keys with a live value
    pub fn len(&self) -> usize {
        self.key_values.len()
    }

    /// Current value of a key
    pub fn get(&self, key: &K) -> Option<V> {
        self.key_values.get(key).copied()
    }

    /// Inserts a pair, keeping the smaller value if the key is already present
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(&current) = self.key_values.get(&key) {
            if current <= value {
                return;
            }
        }
        self.key_values.insert(key, value);
        self.push_into_blocks(key, value);
    }

    /// Prepends pairs whose values are no larger than anything already queued.
    ///
    /// Duplicate keys keep their smallest value, and pairs that do not improve
    /// on a key's current value are ignored. Pairs above the smallest value of
    /// the batch region would break its ordering and are inserted normally.
    pub fn batch_prepend(&mut self, pairs: Vec<(K, V)>) {
        if pairs.is_empty() {
            return;
        }

        let mut best: HashMap<K, V> = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            best.entry(key)
                .and_modify(|current| {
                    if value < *current {
                        *current = value;
                    }
                })
                .or_insert(value);
        }

        let mut batch: Vec<(K, V)> = best
            .into_iter()
            .filter(|(key, value)| {
                self.key_values
                    .get(key)
                    .map_or(true, |current| value < current)
            })
            .collect();
        batch.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        let split = match self.batch_region_min() {
            Some(front) => batch.partition_point(|&(_, value)| value <= front),
            None => batch.len(),
        };
        let overflow = batch.split_off(split);

        for &(key, value) in &batch {
            self.key_values.insert(key, value);
        }
        if !batch.is_empty() {
            self.batches.push_front(batch.into());
        }
        for (key, value) in overflow {
            self.insert(key, value);
        }
    }

    /// Removes and returns up to `M` keys with the smallest values, together
    /// with a separator no smaller than any returned value and no larger than
    /// any value left in the queue (the ceiling `B` once the queue is empty).
    pub fn pull(&mut self) -> (Vec<K>, V) {
        if self.is_empty() {
            return (Vec::new(), self.upper_bound);
        }

        let mut candidates: Vec<(K, V, Region)> = Vec::with_capacity(self.capacity * 2);

        // The batch region is sorted front to back, so its M smallest live
        // pairs are simply the first M live ones.
        let mut taken = 0;
        while taken < self.capacity {
            let next = match self.batches.front_mut() {
                Some(batch) => batch.pop_front(),
                None => break,
            };
            match next {
                Some((key, value)) => {
                    if self.is_live(&key, value) {
                        candidates.push((key, value, Region::Batch));
                        taken += 1;
                    }
                }
                None => {
                    self.batches.pop_front();
                }
            }
        }

        // Blocks are only ordered relative to each other, so whole blocks are
        // taken until at least M live pairs are in hand.
        taken = 0;
        while taken < self.capacity {
            let Some(block) = self.blocks.pop_front() else {
                break;
            };
            for (key, value) in block.pairs {
                if self.is_live(&key, value) {
                    candidates.push((key, value, Region::Block));
                    taken += 1;
                }
            }
        }

        candidates.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        candidates.dedup_by(|a, b| a.0 == b.0);

        let rest = candidates.split_off(candidates.len().min(self.capacity));
        let mut keys = Vec::with_capacity(candidates.len());
        for (key, _, _) in candidates {
            self.key_values.remove(&key);
            keys.push(key);
        }

        // Unselected candidates go back to the front of the region they came
        // from; they are no larger than anything left behind in that region.
        let (batch_rest, block_rest): (Vec<_>, Vec<_>) = rest
            .into_iter()
            .partition(|&(_, _, region)| region == Region::Batch);
        if !batch_rest.is_empty() {
            self.batches
                .push_front(batch_rest.into_iter().map(|(k, v, _)| (k, v)).collect());
        }
        if let Some(&(_, max_value, _)) = block_rest.last() {
            self.blocks.push_front(Block {
                pairs: block_rest.into_iter().map(|(k, v, _)| (k, v)).collect(),
                upper_bound: max_value,
            });
            if self.blocks[0].pairs.len() > 2 * self.capacity {
                self.split_block(0);
            }
        }
        if self.blocks.is_empty() {
            self.blocks.push_back(Block {
                pairs: Vec::new(),
                upper_bound: self.upper_bound,
            });
        }

        let separator = match (self.batch_region_min(), self.block_region_min()) {
            (Some(a), Some(b)) => std::cmp::min(a, b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => self.upper_bound,
        };

        (keys, separator)
    }

    #[inline]
    fn is_live(&self, key: &K, value: V) -> bool {
        self.key_values.get(key) == Some(&value)
    }

    /// Places a pair in the first block whose upper bound covers it
    fn push_into_blocks(&mut self, key: K, value: V) {
        if self.blocks.is_empty() {
            self.blocks.push_back(Block {
                pairs: Vec::new(),
                upper_bound: self.upper_bound,
            });
        }

        let mut idx = self.blocks.partition_point(|block| block.upper_bound < value);
        if idx == self.blocks.len() {
            idx -= 1;
            self.blocks[idx].upper_bound = value;
        }

        self.blocks[idx].pairs.push((key, value));
        if self.blocks[idx].pairs.len() > 2 * self.capacity {
            self.split_block(idx);
        }
    }

    /// Splits an oversized block around its median value
    fn split_block(&mut self, idx: usize) {
        let key_values = &self.key_values;
        let block = &mut self.blocks[idx];
        block.pairs.retain(|(key, value)| key_values.get(key) == Some(value));
        if block.pairs.len() <= 2 * self.capacity {
            return;
        }

        block.pairs.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        let median_idx = block.pairs.len() / 2;
        let median_value = block.pairs[median_idx].1;

        let upper = Block {
            pairs: block.pairs.split_off(median_idx),
            upper_bound: block.upper_bound,
        };
        block.upper_bound = median_value;

        self.blocks.insert(idx + 1, upper);
    }

    /// Smallest live value in the batch region, dropping dead pairs at its head
    fn batch_region_min(&mut self) -> Option<V> {
        while let Some(batch) = self.batches.front_mut() {
            while let Some(&(key, value)) = batch.front() {
                if self.key_values.get(&key) == Some(&value) {
                    return Some(value);
                }
                batch.pop_front();
            }
            self.batches.pop_front();
        }
        None
    }

    /// Smallest live value in the block region, compacting blocks it scans
    fn block_region_min(&mut self) -> Option<V> {
        let key_values = &self.key_values;
        for block in self.blocks.iter_mut() {
            block.pairs.retain(|(key, value)| key_values.get(key) == Some(value));
            if let Some(min) = block.pairs.iter().map(|&(_, value)| value).min() {
                return Some(min);
            }
        }
        None
    }
}
