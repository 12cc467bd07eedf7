//! Immutable sets backed by acceptors.

use super::{
    cardinality, cardinality_cmp, concatenates_on_track, encode_symbols, ensure_closable,
    ensure_finite, write_sample, Cardinality, Elements, FsmMap,
};
use crate::codec::{ensure_same, Codec, CodecRegistry};
use crate::error::{Error, Result};
use crate::fst::{Fst, Paths};
use crate::symbol::{Symbol, PAD};
use crate::value::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// An immutable set of values backed by a finite-state acceptor.
///
/// Besides the usual set algebra, an `FsmSet` supports the rational
/// operations of its automaton: concatenation, closure, and the cross
/// product with another set (which yields an [`FsmMap`]). Sets built with
/// [`FsmSet::closure`] may be infinite; enumerate them with a limit.
///
/// # Example
///
/// ```
/// use fsmcontainers::codec::CodecRegistry;
/// use fsmcontainers::container::{Cardinality, FsmSet};
///
/// let registry = CodecRegistry::new();
/// let ab = FsmSet::new(&registry, ["a", "b"]).unwrap();
///
/// let star = ab.closure().unwrap();
/// assert_eq!(star.len(), Cardinality::Infinite);
/// assert!(star.iter(None).is_err());
///
/// let first: Vec<_> = star.to_vec(Some(3)).unwrap();
/// assert_eq!(first, vec!["", "a", "b"]);
/// ```
#[derive(Clone)]
pub struct FsmSet {
    fst: Arc<Fst>,
    codec: Arc<Codec>,
}

impl FsmSet {
    /// Build a set from values of one shape.
    ///
    /// The first value is the prototype that picks the codec; an empty input
    /// gives an empty set of text.
    ///
    /// # Errors
    ///
    /// Fails without building anything if the prototype has no codec or any
    /// value cannot be encoded by it.
    pub fn new<I, V>(registry: &CodecRegistry, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let codec = match values.first() {
            Some(prototype) => registry.codec_for(prototype)?,
            None => registry.text(),
        };
        FsmSet::encoded(codec, &values)
    }

    /// Encode every value with `codec` before building anything.
    fn encoded(codec: Arc<Codec>, values: &[Value]) -> Result<Self> {
        let tracks = values
            .iter()
            .map(|value| encode_symbols(&codec, value))
            .collect::<Result<Vec<_>>>()?;

        trace!(elements = tracks.len(), shape = %codec.shape(), "building set");
        let fst = Fst::string_map(tracks.into_iter().map(|track| (track.clone(), track)));
        Ok(FsmSet::from_fst(fst, codec))
    }

    /// A set holding one value.
    pub fn singleton(registry: &CodecRegistry, value: impl Into<Value>) -> Result<Self> {
        let value: Value = value.into();
        FsmSet::new(registry, [value])
    }

    /// Wrap an existing acceptor.
    ///
    /// The caller vouches that every track `fst` accepts was written by
    /// `codec`; otherwise enumeration reports [`Error::Decode`].
    pub fn from_fst(fst: Fst, codec: Arc<Codec>) -> Self {
        FsmSet {
            fst: Arc::new(fst.optimize()),
            codec,
        }
    }

    /// The underlying acceptor.
    pub fn fst(&self) -> &Arc<Fst> {
        &self.fst
    }

    /// The element codec.
    pub fn codec(&self) -> &Arc<Codec> {
        &self.codec
    }

    /// Whether `value` is a member.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `value` cannot be encoded by the element
    /// codec.
    pub fn contains(&self, value: impl Into<Value>) -> Result<bool> {
        let symbols = encode_symbols(&self.codec, &value.into())?;
        Ok(!Fst::acceptor(symbols).compose(&self.fst).is_empty())
    }

    /// Number of elements.
    pub fn len(&self) -> Cardinality {
        cardinality(&self.fst)
    }

    /// Compare the number of elements with `n`, enumerating at most `n + 1`.
    pub fn len_cmp(&self, n: usize) -> Ordering {
        cardinality_cmp(&self.fst, n)
    }

    /// Whether the set has no elements.
    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// Whether both sets hold the same elements.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if the element codecs differ; sets of different
    /// shapes are not comparable.
    pub fn equivalent(&self, other: &FsmSet) -> Result<bool> {
        ensure_same(&self.codec, &other.codec, "equivalent", "element codecs differ")?;
        Ok(self.fst.equivalent(&other.fst))
    }

    fn binary<F>(&self, other: &FsmSet, operation: &'static str, op: F) -> Result<FsmSet>
    where
        F: FnOnce(&Fst, &Fst) -> Fst,
    {
        ensure_same(&self.codec, &other.codec, operation, "element codecs differ")?;
        trace!(operation, "set algebra");
        Ok(FsmSet::from_fst(op(&*self.fst, &*other.fst), Arc::clone(&self.codec)))
    }

    /// Elements in either set.
    pub fn union(&self, other: &FsmSet) -> Result<FsmSet> {
        self.binary(other, "union", Fst::union)
    }

    /// Elements in both sets.
    pub fn intersection(&self, other: &FsmSet) -> Result<FsmSet> {
        self.binary(other, "intersection", Fst::intersect)
    }

    /// Elements of `self` not in `other`.
    pub fn difference(&self, other: &FsmSet) -> Result<FsmSet> {
        self.binary(other, "difference", Fst::difference)
    }

    /// Elements in exactly one of the sets.
    pub fn symmetric_difference(&self, other: &FsmSet) -> Result<FsmSet> {
        self.binary(other, "symmetric difference", |a, b| {
            a.union(b).difference(&a.intersect(b))
        })
    }

    /// Every concatenation of an element of `self` with one of `other`.
    ///
    /// Tuples concatenate field by field. That result is built from the
    /// enumerated elements, so both tuple sets must be finite.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if the element codecs differ, or
    /// [`Error::Unsupported`] for an infinite tuple operand.
    pub fn concat(&self, other: &FsmSet) -> Result<FsmSet> {
        if concatenates_on_track(&self.codec) {
            return self.binary(other, "concat", Fst::concat);
        }
        ensure_same(&self.codec, &other.codec, "concat", "element codecs differ")?;
        ensure_finite(&self.fst, "concat")?;
        ensure_finite(&other.fst, "concat")?;

        let left = self.to_vec(None)?;
        let right = other.to_vec(None)?;
        trace!(left = left.len(), right = right.len(), "fieldwise set concat");
        let joined = left
            .iter()
            .flat_map(|a| right.iter().map(move |b| a.concat(b)))
            .collect::<Result<Vec<_>>>()?;
        FsmSet::encoded(Arc::clone(&self.codec), &joined)
    }

    /// Zero or more concatenated elements.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] for a set of tuples.
    pub fn closure(&self) -> Result<FsmSet> {
        ensure_closable(&self.codec, "closure")?;
        Ok(FsmSet::from_fst(self.fst.closure(), Arc::clone(&self.codec)))
    }

    /// One or more concatenated elements.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] for a set of tuples.
    pub fn plus(&self) -> Result<FsmSet> {
        ensure_closable(&self.codec, "plus")?;
        Ok(FsmSet::from_fst(self.fst.plus(), Arc::clone(&self.codec)))
    }

    /// Map every element of `self` to every element of `other`.
    ///
    /// The sets may have different shapes.
    pub fn cross(&self, other: &FsmSet) -> FsmMap {
        trace!("set cross product");
        FsmMap::from_fst(
            self.fst.cross(&other.fst),
            Arc::clone(&self.codec),
            Arc::clone(&other.codec),
        )
    }

    /// Restrict `map` to the keys in this set.
    ///
    /// # Errors
    ///
    /// [`Error::Incompatible`] if the element codec is not the map's key
    /// codec.
    pub fn compose(&self, map: &FsmMap) -> Result<FsmMap> {
        ensure_same(
            &self.codec,
            map.key_codec(),
            "compose",
            "set codec differs from map key codec",
        )?;
        Ok(FsmMap::from_fst(
            self.fst.compose(map.fst()),
            Arc::clone(&self.codec),
            Arc::clone(map.value_codec()),
        ))
    }

    /// Whether every element of `self` is in `other`.
    pub fn is_subset(&self, other: &FsmSet) -> Result<bool> {
        Ok(self.difference(other)?.is_empty())
    }

    /// Whether every element of `other` is in `self`.
    pub fn is_superset(&self, other: &FsmSet) -> Result<bool> {
        other.is_subset(self)
    }

    /// Subset, and not equal.
    pub fn is_proper_subset(&self, other: &FsmSet) -> Result<bool> {
        Ok(self.is_subset(other)? && !other.is_subset(self)?)
    }

    /// Superset, and not equal.
    pub fn is_proper_superset(&self, other: &FsmSet) -> Result<bool> {
        other.is_proper_subset(self)
    }

    /// Whether the sets share no element.
    pub fn is_disjoint(&self, other: &FsmSet) -> Result<bool> {
        Ok(self.intersection(other)?.is_empty())
    }

    /// The only element of a one-element set.
    ///
    /// # Errors
    ///
    /// [`Error::NotSingleton`] unless the set has exactly one element.
    pub fn single(&self) -> Result<Value> {
        if self.len_cmp(1) != Ordering::Equal {
            return Err(Error::NotSingleton(self.len()));
        }
        self.iter(Some(1))?
            .next()
            .unwrap_or(Err(Error::NotSingleton(Cardinality::Finite(0))))
    }

    /// Iterate over the elements, shortest first.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundedEnumeration`] if `limit` is `None` and the set is
    /// infinite.
    pub fn iter(&self, limit: Option<usize>) -> Result<Elements> {
        let paths = Paths::checked(Arc::clone(&self.fst), limit)?;
        Ok(Elements::new(paths, Arc::clone(&self.codec)))
    }

    /// Collect the elements, shortest first.
    pub fn to_vec(&self, limit: Option<usize>) -> Result<Vec<Value>> {
        self.iter(limit)?.collect()
    }

    /// A text set of every symbol on the automaton's transitions.
    ///
    /// Each multi-character token is one element, written in brackets. The
    /// tuple pad is never included.
    pub fn sigma(&self, registry: &CodecRegistry) -> Result<FsmSet> {
        sigma_set(&self.fst, registry)
    }

    /// The closure of [`FsmSet::sigma`].
    pub fn sigma_star(&self, registry: &CodecRegistry) -> Result<FsmSet> {
        self.sigma(registry)?.closure()
    }
}

pub(super) fn sigma_set(fst: &Fst, registry: &CodecRegistry) -> Result<FsmSet> {
    let pad = Symbol::Char(PAD);
    let symbols: Vec<Value> = fst
        .sigma()
        .into_iter()
        .filter(|symbol| *symbol != pad)
        .map(|symbol| Value::Text(symbol.to_track()))
        .collect();
    FsmSet::new(registry, symbols)
}

impl fmt::Display for FsmSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample: Vec<Value> = self
            .iter(Some(4))
            .map(|elements| elements.filter_map(Result::ok).collect())
            .unwrap_or_default();
        f.write_str("FsmSet({")?;
        write_sample(f, sample, |f, value| write!(f, "{}", value))?;
        f.write_str("})")
    }
}

impl fmt::Debug for FsmSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmSet")
            .field("shape", self.codec.shape())
            .field("states", &self.fst.num_states())
            .finish()
    }
}
