//! Immutable multimaps backed by transducers.

use super::set::sigma_set;
use super::{
    cardinality, cardinality_cmp, concatenates_on_track, encode_symbols, ensure_closable,
    ensure_finite, write_sample, Cardinality, Elements, FsmSet, Items, Lookup, Side, View,
};
use crate::ambiguity::AmbiguityCheck;
use crate::codec::{ensure_same, Codec, CodecRegistry};
use crate::error::{Error, Result};
use crate::fst::{Fst, Paths, Tape};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// An immutable multimap backed by a finite-state transducer.
///
/// A key may map to several values. [`FsmMap::get`] returns the first value
/// in path order (fewest symbols, then lexicographic); [`FsmMap::get_all`]
/// returns every value as an [`FsmSet`]. [`FsmMap::lookup`] picks between
/// the two according to the map's [`View`].
///
/// Maps compose like relations: `a.compose(&b)` feeds the values of `a` into
/// the keys of `b`.
///
/// # Example
///
/// ```
/// use fsmcontainers::codec::CodecRegistry;
/// use fsmcontainers::container::FsmMap;
///
/// let registry = CodecRegistry::new();
/// let digits = FsmMap::new(&registry, [("one", "1"), ("two", "2")]).unwrap();
/// let roman = FsmMap::new(&registry, [("1", "I"), ("2", "II")]).unwrap();
///
/// let both = digits.compose(&roman).unwrap();
/// assert_eq!(both.get("two").unwrap(), "II");
/// assert!(both.get("three").is_err());
/// ```
#[derive(Clone)]
pub struct FsmMap {
    fst: Arc<Fst>,
    key_codec: Arc<Codec>,
    value_codec: Arc<Codec>,
    view: View,
}

impl FsmMap {
    /// Build a map from `(key, value)` pairs.
    ///
    /// The first pair is the prototype for both codecs; an empty input gives
    /// an empty text-to-text map. Duplicate keys are kept as separate pairs.
    ///
    /// # Errors
    ///
    /// Fails without building anything if a prototype has no codec or any
    /// key or value cannot be encoded.
    pub fn new<I, K, V>(registry: &CodecRegistry, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let pairs: Vec<(Value, Value)> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let (key_codec, value_codec) = match pairs.first() {
            Some((key, value)) => (registry.codec_for(key)?, registry.codec_for(value)?),
            None => (registry.text(), registry.text()),
        };
        FsmMap::encoded(key_codec, value_codec, &pairs)
    }

    /// Encode every pair before building anything.
    fn encoded(
        key_codec: Arc<Codec>,
        value_codec: Arc<Codec>,
        pairs: &[(Value, Value)],
    ) -> Result<Self> {
        let tracks = pairs
            .iter()
            .map(|(key, value)| -> Result<_> {
                Ok((
                    encode_symbols(&key_codec, key)?,
                    encode_symbols(&value_codec, value)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(
            pairs = tracks.len(),
            key = %key_codec.shape(),
            value = %value_codec.shape(),
            "building map"
        );
        Ok(FsmMap::from_fst(
            Fst::string_map(tracks),
            key_codec,
            value_codec,
        ))
    }

    /// Wrap an existing transducer.
    ///
    /// The caller vouches that its input tracks were written by `key_codec`
    /// and its output tracks by `value_codec`.
    pub fn from_fst(fst: Fst, key_codec: Arc<Codec>, value_codec: Arc<Codec>) -> Self {
        FsmMap {
            fst: Arc::new(fst.optimize()),
            key_codec,
            value_codec,
            view: View::One,
        }
    }

    /// The underlying transducer.
    pub fn fst(&self) -> &Arc<Fst> {
        &self.fst
    }

    /// The key codec.
    pub fn key_codec(&self) -> &Arc<Codec> {
        &self.key_codec
    }

    /// The value codec.
    pub fn value_codec(&self) -> &Arc<Codec> {
        &self.value_codec
    }

    /// How [`FsmMap::lookup`] answers.
    pub fn view(&self) -> View {
        self.view
    }

    /// The same map, with lookups returning every value.
    pub fn all(&self) -> FsmMap {
        self.with_view(View::All)
    }

    /// The same map, with lookups returning at most `n` values.
    pub fn only(&self, n: usize) -> FsmMap {
        self.with_view(View::Only(n))
    }

    fn with_view(&self, view: View) -> FsmMap {
        FsmMap {
            view,
            ..self.clone()
        }
    }

    /// Acceptor of the values `key` maps to.
    fn matches(&self, key: &Value) -> Result<Fst> {
        let symbols = encode_symbols(&self.key_codec, key)?;
        Ok(Fst::acceptor(symbols)
            .compose(&self.fst)
            .project(Tape::Output)
            .optimize())
    }

    /// Whether `key` maps to at least one value.
    pub fn contains(&self, key: impl Into<Value>) -> Result<bool> {
        Ok(!self.matches(&key.into())?.is_empty())
    }

    /// The first value for `key`, fewest symbols first, then lexicographic.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `key` has no value, or
    /// [`Error::Validation`] if it cannot be encoded.
    pub fn get(&self, key: impl Into<Value>) -> Result<Value> {
        let key = key.into();
        let values = self.matches(&key)?;
        match Paths::new(Arc::new(values), Some(1)).next() {
            Some(path) => self.value_codec.decode(&path.input_track()),
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Every value for `key`.
    ///
    /// # Errors
    ///
    /// Same as [`FsmMap::get`].
    pub fn get_all(&self, key: impl Into<Value>) -> Result<FsmSet> {
        let key = key.into();
        let values = self.matches(&key)?;
        if values.is_empty() {
            return Err(Error::KeyNotFound(key.to_string()));
        }
        Ok(FsmSet::from_fst(values, Arc::clone(&self.value_codec)))
    }

    /// Look up `key` according to the map's [`View`].
    pub fn lookup(&self, key: impl Into<Value>) -> Result<Lookup> {
        match self.view {
            View::One => self.get(key).map(Lookup::One),
            View::All => self.get_all(key).map(Lookup::Many),
            View::Only(n) => {
                let values = self.get_all(key)?;
                let shortest = Paths::new(Arc::clone(values.fst()), Some(n))
                    .map(|path| (path.input.clone(), path.input));
                Ok(Lookup::Many(FsmSet::from_fst(
                    Fst::string_map(shortest),
                    Arc::clone(&self.value_codec),
                )))
            }
        }
    }

    /// Every value of every key in `keys`.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if the set's codec is not the key codec.
    pub fn image(&self, keys: &FsmSet) -> Result<FsmSet> {
        Ok(keys.compose(self)?.project(Side::Value))
    }

    /// Distinct keys, shortest first.
    pub fn keys(&self, limit: Option<usize>) -> Result<Elements> {
        let keys = self.fst.project(Tape::Input).optimize();
        let paths = Paths::checked(Arc::new(keys), limit)?;
        Ok(Elements::new(paths, Arc::clone(&self.key_codec)))
    }

    /// Distinct values, shortest first.
    pub fn values(&self, limit: Option<usize>) -> Result<Elements> {
        let values = self.fst.project(Tape::Output).optimize();
        let paths = Paths::checked(Arc::new(values), limit)?;
        Ok(Elements::new(paths, Arc::clone(&self.value_codec)))
    }

    /// Distinct `(key, value)` pairs, shortest first.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundedEnumeration`] if `limit` is `None` and the map is
    /// infinite.
    pub fn items(&self, limit: Option<usize>) -> Result<Items> {
        let paths = Paths::checked(Arc::clone(&self.fst), limit)?;
        Ok(Items::new(
            paths,
            Arc::clone(&self.key_codec),
            Arc::clone(&self.value_codec),
        ))
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> Cardinality {
        cardinality(&self.fst)
    }

    /// Compare the number of pairs with `n`, enumerating at most `n + 1`.
    pub fn len_cmp(&self, n: usize) -> Ordering {
        cardinality_cmp(&self.fst, n)
    }

    /// Whether the map has no pairs.
    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    fn ensure_same_codecs(&self, other: &FsmMap, operation: &'static str) -> Result<()> {
        ensure_same(&self.key_codec, &other.key_codec, operation, "key codecs differ")?;
        ensure_same(
            &self.value_codec,
            &other.value_codec,
            operation,
            "value codecs differ",
        )
    }

    /// Whether both maps hold the same pairs.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if either codec differs.
    pub fn equivalent(&self, other: &FsmMap) -> Result<bool> {
        self.ensure_same_codecs(other, "equivalent")?;
        Ok(self.fst.equivalent(&other.fst))
    }

    fn binary<F>(&self, other: &FsmMap, operation: &'static str, op: F) -> Result<FsmMap>
    where
        F: FnOnce(&Fst, &Fst) -> Fst,
    {
        self.ensure_same_codecs(other, operation)?;
        trace!(operation, "map algebra");
        Ok(FsmMap::from_fst(
            op(&*self.fst, &*other.fst),
            Arc::clone(&self.key_codec),
            Arc::clone(&self.value_codec),
        ))
    }

    /// Pairs in either map.
    pub fn union(&self, other: &FsmMap) -> Result<FsmMap> {
        self.binary(other, "union", Fst::union)
    }

    /// Concatenate keys with keys and values with values.
    ///
    /// Tuple keys or values concatenate field by field. That result is built
    /// from the enumerated pairs, so both maps must then be finite.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if either codec differs, or
    /// [`Error::Unsupported`] for an infinite map with tuple keys or values.
    pub fn concat(&self, other: &FsmMap) -> Result<FsmMap> {
        if concatenates_on_track(&self.key_codec) && concatenates_on_track(&self.value_codec) {
            return self.binary(other, "concat", Fst::concat);
        }
        self.ensure_same_codecs(other, "concat")?;
        ensure_finite(&self.fst, "concat")?;
        ensure_finite(&other.fst, "concat")?;

        let left = self.items(None)?.collect::<Result<Vec<_>>>()?;
        let right = other.items(None)?.collect::<Result<Vec<_>>>()?;
        trace!(left = left.len(), right = right.len(), "fieldwise map concat");
        let joined = left
            .iter()
            .flat_map(|(k1, v1)| {
                right
                    .iter()
                    .map(move |(k2, v2)| -> Result<(Value, Value)> {
                        Ok((k1.concat(k2)?, v1.concat(v2)?))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        FsmMap::encoded(
            Arc::clone(&self.key_codec),
            Arc::clone(&self.value_codec),
            &joined,
        )
    }

    fn ensure_closable(&self, operation: &'static str) -> Result<()> {
        ensure_closable(&self.key_codec, operation)?;
        ensure_closable(&self.value_codec, operation)
    }

    /// Zero or more concatenated pairs.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if keys or values are tuples.
    pub fn closure(&self) -> Result<FsmMap> {
        self.ensure_closable("closure")?;
        Ok(FsmMap::from_fst(
            self.fst.closure(),
            Arc::clone(&self.key_codec),
            Arc::clone(&self.value_codec),
        ))
    }

    /// One or more concatenated pairs.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if keys or values are tuples.
    pub fn plus(&self) -> Result<FsmMap> {
        self.ensure_closable("plus")?;
        Ok(FsmMap::from_fst(
            self.fst.plus(),
            Arc::clone(&self.key_codec),
            Arc::clone(&self.value_codec),
        ))
    }

    /// Swap keys and values.
    pub fn invert(&self) -> FsmMap {
        FsmMap::from_fst(
            self.fst.invert(),
            Arc::clone(&self.value_codec),
            Arc::clone(&self.key_codec),
        )
    }

    /// The set of keys or of values.
    pub fn project(&self, side: Side) -> FsmSet {
        let (tape, codec) = match side {
            Side::Key => (Tape::Input, &self.key_codec),
            Side::Value => (Tape::Output, &self.value_codec),
        };
        FsmSet::from_fst(self.fst.project(tape), Arc::clone(codec))
    }

    fn ensure_pluggable(&self, other: &FsmMap, operation: &'static str) -> Result<()> {
        ensure_same(
            &self.value_codec,
            &other.key_codec,
            operation,
            "value codec of the left map differs from key codec of the right map",
        )
    }

    /// Feed the values of `self` into the keys of `other`.
    ///
    /// Keys whose values `other` cannot read are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] unless `self`'s value codec is `other`'s key
    /// codec.
    pub fn compose(&self, other: &FsmMap) -> Result<FsmMap> {
        self.ensure_pluggable(other, "compose")?;
        trace!("map composition");
        Ok(FsmMap::from_fst(
            self.fst.compose(&other.fst),
            Arc::clone(&self.key_codec),
            Arc::clone(&other.value_codec),
        ))
    }

    /// Like [`FsmMap::compose`], but keys whose values `other` cannot read
    /// keep their values from `self`.
    pub fn lenient_compose(&self, other: &FsmMap) -> Result<FsmMap> {
        self.ensure_pluggable(other, "lenient compose")?;
        trace!("lenient map composition");
        Ok(FsmMap::from_fst(
            self.fst.lenient_compose(&other.fst),
            Arc::clone(&self.key_codec),
            Arc::clone(&other.value_codec),
        ))
    }

    /// Look for a key with two different values by random sampling.
    ///
    /// Returns two values of one key, or `None` if no sample disagreed. A
    /// `None` is evidence, not proof, that the map is a function; see
    /// [`AmbiguityCheck`] for the sampling details.
    pub fn find_nonfunctional(&self, sample_size: usize) -> Result<Option<(Value, Value)>> {
        AmbiguityCheck::new().sample_size(sample_size).run(self)
    }

    /// A text set of every symbol on either side.
    pub fn sigma(&self, registry: &CodecRegistry) -> Result<FsmSet> {
        sigma_set(&self.fst, registry)
    }

    /// The closure of [`FsmMap::sigma`].
    pub fn sigma_star(&self, registry: &CodecRegistry) -> Result<FsmSet> {
        self.sigma(registry)?.closure()
    }
}

impl fmt::Display for FsmMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample: Vec<(Value, Value)> = self
            .items(Some(4))
            .map(|items| items.filter_map(Result::ok).collect())
            .unwrap_or_default();
        f.write_str("FsmMap({")?;
        write_sample(f, sample, |f, (key, value)| write!(f, "{}: {}", key, value))?;
        f.write_str("})")
    }
}

impl fmt::Debug for FsmMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmMap")
            .field("key", self.key_codec.shape())
            .field("value", self.value_codec.shape())
            .field("view", &self.view)
            .field("states", &self.fst.num_states())
            .finish()
    }
}
