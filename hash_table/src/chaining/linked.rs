//! Hash table with separate chaining through an entry arena
//!
//! Entries live in one `Vec`, every bucket stores the index of the first entry
//! in its chain and every entry stores the index of its successor. Resizing only
//! rewrites those indices, so the value arrays are never moved or copied.

use core::{fmt, iter, mem};

use array::GrowableArray;
use log::{debug, trace, warn};

use crate::config::TableConfig;
use crate::hash::HashFunction;
use crate::TableError;

type Link = Option<usize>;

struct Entry {
    key: String,
    values: GrowableArray,
    next: Link,
}

pub struct HashTable<H> {
    // INVARIANTS:
    //  * `buckets.len() == cap` and `cap > 0`
    //  * every index of `entries` is reachable from exactly one bucket, exactly once,
    //    and that bucket is `hash(key) % cap`
    //  * keys are unique across `entries`
    buckets: Vec<Link>,
    entries: Vec<Entry>,
    cap: usize,
    max_load_factor: f64,
    values_cap: usize,
    hash_function: H,
}

impl<H> fmt::Debug for HashTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("cap", &self.cap)
            .field("len", &self.len())
            .field("max_load_factor", &self.max_load_factor)
            .field("buckets", &DebugBuckets(self))
            .finish()
    }
}

struct DebugBuckets<'a, H>(&'a HashTable<H>);

impl<'a, H> fmt::Debug for DebugBuckets<'a, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();

        for head in &self.0.buckets {
            list.entry(&DebugChain(self.0, *head));
        }

        list.finish()
    }
}

struct DebugChain<'a, H>(&'a HashTable<H>, Link);

impl<'a, H> fmt::Debug for DebugChain<'a, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.0
                    .chain(self.1)
                    .map(|entry| (&entry.key, entry.values.as_slice())),
            )
            .finish()
    }
}

impl<H> HashTable<H> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.cap as f64
    }

    /// Iterates over all keys and their values, bucket by bucket and in chain order
    /// within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GrowableArray)> + '_ {
        self.buckets
            .iter()
            .flat_map(move |head| self.chain(*head))
            .map(|entry| (entry.key.as_str(), &entry.values))
    }

    fn chain(&self, head: Link) -> impl Iterator<Item = &Entry> + '_ {
        iter::successors(head.map(|i| &self.entries[i]), move |entry| {
            entry.next.map(|i| &self.entries[i])
        })
    }

    /// Points the link in front of a chain position at `target`.
    ///
    /// `prev == None` means the bucket head itself.
    fn set_link(&mut self, bucket: usize, prev: Link, target: Link) {
        match prev {
            None => self.buckets[bucket] = target,
            Some(p) => self.entries[p].next = target,
        }
    }

    #[cfg(test)]
    pub(super) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(move |head| self.chain(*head).count())
    }
}

impl<H> HashTable<H>
where
    H: HashFunction,
{
    pub fn new(
        capacity: usize,
        max_load_factor: f64,
        hash_function: H,
    ) -> Result<Self, TableError> {
        let config = TableConfig {
            capacity,
            max_load_factor,
            ..TableConfig::default()
        };
        Self::with_config(config, hash_function)
    }

    pub fn with_config(config: TableConfig, hash_function: H) -> Result<Self, TableError> {
        config.validate()?;

        Ok(Self {
            buckets: empty_buckets(config.capacity)?,
            entries: Vec::new(),
            cap: config.capacity,
            max_load_factor: config.max_load_factor,
            values_cap: config.values_capacity,
            hash_function,
        })
    }

    /// Appends `value` to the values of `key`, adding the key if it isn't present.
    ///
    /// If the load factor has reached the maximum the table doubles before the
    /// insert, whether or not `key` is new. It doubles at most once per insert,
    /// so with a small capacity or maximum load factor the ratio can stay above
    /// the maximum for several inserts (e.g. `new(1, 0.75, ..)` sits at 1.0
    /// after the first insert).
    pub fn insert(&mut self, key: &str, value: i32) -> Result<(), TableError> {
        if key.is_empty() {
            return Err(TableError::InvalidArgument("key must not be empty"));
        }

        if self.load_factor() >= self.max_load_factor {
            self.resize()?;
        }

        let bucket = self.bucket_index(key);
        let mut tail = None;
        let mut cursor = self.buckets[bucket];
        while let Some(i) = cursor {
            let entry = &mut self.entries[i];
            if entry.key == key {
                return entry.values.append(value).map_err(TableError::from);
            }
            tail = Some(i);
            cursor = entry.next;
        }

        let entry = self.new_entry(key, value)?;
        self.entries.try_reserve(1)?;
        let index = self.entries.len();
        self.entries.push(entry);
        self.set_link(bucket, tail, Some(index));

        trace!("inserted new key {key:?} into bucket {bucket}");
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<&GrowableArray> {
        let (_, _, index) = self.find(key)?;
        Some(&self.entries[index].values)
    }

    /// Like [`lookup`](Self::lookup) but allows appending to the values in place.
    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut GrowableArray> {
        let (_, _, index) = self.find(key)?;
        Some(&mut self.entries[index].values)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` and hands back its values.
    ///
    /// The table never shrinks.
    pub fn delete(&mut self, key: &str) -> Result<GrowableArray, TableError> {
        let (bucket, prev, index) = self.find(key).ok_or_else(|| TableError::NotFound {
            key: key.to_owned(),
        })?;

        let next = self.entries[index].next;
        self.set_link(bucket, prev, next);

        let removed = self.entries.swap_remove(index);
        // The last entry (if it wasn't the removed one) now sits at `index`.
        let moved_from = self.entries.len();
        if index != moved_from {
            self.relink_moved(moved_from, index);
        }

        debug!("deleted key {key:?} with {} values", removed.values.len());
        Ok(removed.values)
    }

    #[inline]
    fn bucket_index(&self, key: &str) -> usize {
        // The remainder is below `self.cap`, so it fits back into usize.
        (self.hash_function.hash(key.as_bytes()) % self.cap as u64) as usize
    }

    /// Returns (bucket, previous entry in the chain, entry) for `key`.
    fn find(&self, key: &str) -> Option<(usize, Link, usize)> {
        if key.is_empty() {
            return None;
        }

        let bucket = self.bucket_index(key);
        let mut prev = None;
        let mut cursor = self.buckets[bucket];
        while let Some(i) = cursor {
            let entry = &self.entries[i];
            if entry.key == key {
                return Some((bucket, prev, i));
            }
            prev = Some(i);
            cursor = entry.next;
        }

        None
    }

    fn new_entry(&self, key: &str, value: i32) -> Result<Entry, TableError> {
        let mut owned = String::new();
        owned.try_reserve_exact(key.len())?;
        owned.push_str(key);

        let mut values = GrowableArray::with_capacity(self.values_cap)?;
        values.append(value)?;

        Ok(Entry {
            key: owned,
            values,
            next: None,
        })
    }

    /// Repoints the link that referenced entry `from` to `to`, after `swap_remove`
    /// moved the entry.
    fn relink_moved(&mut self, from: usize, to: usize) {
        let bucket = self.bucket_index(&self.entries[to].key);
        let mut prev = None;
        let mut cursor = self.buckets[bucket];
        while let Some(i) = cursor {
            if i == from {
                self.set_link(bucket, prev, Some(to));
                return;
            }
            prev = Some(i);
            cursor = self.entries[i].next;
        }

        unreachable!("entry {from} is not linked from its bucket {bucket}")
    }

    /// Doubles the number of buckets and relinks every entry into its new bucket.
    ///
    /// Both bucket arrays are allocated before anything is touched, if that fails
    /// the table is left as it was.
    fn resize(&mut self) -> Result<(), TableError> {
        let new_cap = self
            .cap
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
        let (heads, mut tails) = match empty_buckets(new_cap).and_then(|heads| {
            let tails = empty_buckets(new_cap)?;
            Ok((heads, tails))
        }) {
            Ok(buckets) => buckets,
            Err(err) => {
                warn!("failed to grow hash table to {new_cap} buckets: {err}");
                return Err(err);
            }
        };

        let old_buckets = mem::replace(&mut self.buckets, heads);
        let old_cap = mem::replace(&mut self.cap, new_cap);

        for head in old_buckets {
            let mut cursor = head;
            while let Some(i) = cursor {
                cursor = self.entries[i].next.take();

                let bucket = self.bucket_index(&self.entries[i].key);
                let tail = mem::replace(&mut tails[bucket], Some(i));
                self.set_link(bucket, tail, Some(i));
            }
        }

        debug!(
            "resized hash table from {old_cap} to {new_cap} buckets, {} keys",
            self.len()
        );
        Ok(())
    }
}

fn empty_buckets(cap: usize) -> Result<Vec<Link>, TableError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(cap)?;
    buckets.resize(cap, None);
    Ok(buckets)
}
