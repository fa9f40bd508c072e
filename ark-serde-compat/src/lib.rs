//! # ark-serde-compat
//!
//! Serde helpers that read and write arkworks BN254 types in the human-readable JSON
//! layout produced by snarkjs (`verification_key.json`, `proof.json`, `public.json`).
//!
//! Field elements are decimal strings on output. On input, a field element may be a
//! decimal string, a `0x`-prefixed hexadecimal string or a JSON integer. Every decoded
//! integer must be strictly smaller than the modulus of its field; arkworks' own
//! `FromStr` silently reduces, which would let two different encodings denote the
//! same element.
//!
//! Curve points are sequences of projective coordinates (`[x, y, z]` for G1 and
//! `[[x0, x1], [y0, y1], [z0, z1]]` for G2). Decoded points are always checked to lie
//! on the curve and in the prime-order subgroup.
//!
//! ## Usage
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct MyStruct {
//!     #[serde(serialize_with = "zkcheck_ark_serde_compat::serialize_f")]
//!     #[serde(deserialize_with = "zkcheck_ark_serde_compat::deserialize_f")]
//!     field: ark_bn254::Fr,
//!     #[serde(serialize_with = "zkcheck_ark_serde_compat::bn254::serialize_g1")]
//!     #[serde(deserialize_with = "zkcheck_ark_serde_compat::bn254::deserialize_g1")]
//!     point: ark_bn254::G1Affine,
//! }
//! ```

#![deny(missing_docs)]
use std::marker::PhantomData;

use ark_ec::{
    AffineRepr, CurveGroup,
    short_weierstrass::{Affine, Projective, SWCurveConfig},
};
use ark_ff::{BigInt, PrimeField, QuadExtConfig, QuadExtField, Zero};
use ruint::aliases::U256;
use serde::{Serializer, de, ser::SerializeSeq as _};

pub mod bn254;

/// Errors raised while decoding integers, field elements or curve points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerdeCompatError {
    /// The string is neither a decimal nor a `0x`-prefixed hexadecimal integer.
    #[error("not a decimal or 0x-prefixed hexadecimal integer: {0:?}")]
    InvalidNumber(String),
    /// The integer does not fit into 256 bits.
    #[error("integer does not fit into 256 bits: {0:?}")]
    Overflow(String),
    /// The integer is not smaller than the field modulus.
    #[error("integer is not smaller than the field modulus")]
    NotCanonical,
    /// The point does not satisfy the curve equation.
    #[error("point is not on the curve")]
    NotOnCurve,
    /// The point lies on the curve but outside the prime-order subgroup.
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
}

/// Parses an unsigned 256-bit integer from a decimal or `0x`-prefixed hexadecimal string.
///
/// Surrounding whitespace is ignored. Signs, underscores and empty digit strings are
/// rejected.
pub fn parse_u256(s: &str) -> Result<U256, SerdeCompatError> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| {
            if radix == 16 {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        });
    if !well_formed {
        return Err(SerdeCompatError::InvalidNumber(s.to_owned()));
    }
    U256::from_str_radix(digits, radix).map_err(|_| SerdeCompatError::Overflow(s.to_owned()))
}

/// Converts a 256-bit integer into a field element, rejecting values `>= F::MODULUS`.
pub fn field_from_u256<F>(value: U256) -> Result<F, SerdeCompatError>
where
    F: PrimeField<BigInt = BigInt<4>>,
{
    F::from_bigint(BigInt::new(value.into_limbs())).ok_or(SerdeCompatError::NotCanonical)
}

/// Returns the canonical integer representative of a field element.
pub fn field_to_u256<F>(f: &F) -> U256
where
    F: PrimeField<BigInt = BigInt<4>>,
{
    U256::from_limbs(f.into_bigint().0)
}

/// Parses a field element from a decimal or `0x`-prefixed hexadecimal string.
pub fn parse_field<F>(s: &str) -> Result<F, SerdeCompatError>
where
    F: PrimeField<BigInt = BigInt<4>>,
{
    field_from_u256(parse_u256(s)?)
}

/// Renders a field element as a decimal string (`"0"` for zero).
pub fn field_to_string<F>(f: &F) -> String
where
    F: PrimeField<BigInt = BigInt<4>>,
{
    field_to_u256(f).to_string()
}

/// Checks that an affine point is the identity, or lies on the curve and in the
/// prime-order subgroup.
pub fn check_point<P: SWCurveConfig>(p: Affine<P>) -> Result<Affine<P>, SerdeCompatError> {
    if p.is_zero() {
        return Ok(p);
    }
    if !p.is_on_curve() {
        return Err(SerdeCompatError::NotOnCurve);
    }
    if !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(SerdeCompatError::NotInSubgroup);
    }
    Ok(p)
}

/// Serialize a prime field element as a decimal string.
pub fn serialize_f<S, F>(f: &F, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    F: PrimeField<BigInt = BigInt<4>>,
{
    ser.serialize_str(&field_to_string(f))
}

/// Serialize a sequence of prime field elements as an array of decimal strings.
pub fn serialize_f_seq<S, F>(fs: &[F], ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    F: PrimeField<BigInt = BigInt<4>>,
{
    let mut seq = ser.serialize_seq(Some(fs.len()))?;
    for f in fs {
        seq.serialize_element(&field_to_string(f))?;
    }
    seq.end()
}

/// Deserialize a prime field element from a decimal/hex string or a JSON integer.
pub fn deserialize_f<'de, D, F>(deserializer: D) -> Result<F, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField<BigInt = BigInt<4>>,
{
    let Numeric(s) = de::Deserialize::deserialize(deserializer)?;
    parse_field(&s).map_err(de::Error::custom)
}

/// Deserialize a sequence of prime field elements.
pub fn deserialize_f_seq<'de, D, F>(deserializer: D) -> Result<Vec<F>, D::Error>
where
    D: de::Deserializer<'de>,
    F: PrimeField<BigInt = BigInt<4>>,
{
    let values: Vec<Numeric> = de::Deserialize::deserialize(deserializer)?;
    values
        .iter()
        .map(|Numeric(s)| parse_field(s).map_err(de::Error::custom))
        .collect()
}

/// Deserialize a single `usize` written either as a JSON integer or as a string.
pub fn deserialize_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: de::Deserializer<'de>,
{
    let Numeric(s) = de::Deserialize::deserialize(deserializer)?;
    let value = parse_u256(&s).map_err(de::Error::custom)?;
    usize::try_from(value).map_err(|_| de::Error::custom(format!("{s} does not fit a usize")))
}

/// A number read from JSON, either quoted or as a plain integer literal.
struct Numeric(String);

impl<'de> de::Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(NumericVisitor)
    }
}

struct NumericVisitor;

impl de::Visitor<'_> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a non-negative integer as decimal string, 0x-hex string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Numeric(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Numeric(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Numeric(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(|v| Numeric(v.to_string()))
            .map_err(|_| E::custom(format!("negative integer {v}")))
    }
}

/// Returns `[x, y, "1"]` for finite points and `["0", "1", "0"]` for the identity.
fn g1_to_strings<P>(p: &Affine<P>) -> [String; 3]
where
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    match p.xy() {
        Some((x, y)) => [field_to_string(&x), field_to_string(&y), "1".to_owned()],
        None => ["0".to_owned(), "1".to_owned(), "0".to_owned()],
    }
}

fn g2_to_strings<Q, P>(p: &Affine<P>) -> [[String; 2]; 3]
where
    Q: QuadExtConfig,
    Q::BaseField: PrimeField<BigInt = BigInt<4>>,
    P: SWCurveConfig<BaseField = QuadExtField<Q>>,
{
    let pair = |f: &QuadExtField<Q>| [field_to_string(&f.c0), field_to_string(&f.c1)];
    match p.xy() {
        Some((x, y)) => [pair(&x), pair(&y), ["1".to_owned(), "0".to_owned()]],
        None => [
            ["0".to_owned(), "0".to_owned()],
            ["1".to_owned(), "0".to_owned()],
            ["0".to_owned(), "0".to_owned()],
        ],
    }
}

fn serialize_g1_generic<S, P>(p: &Affine<P>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    let strings = g1_to_strings(p);
    let mut seq = ser.serialize_seq(Some(strings.len()))?;
    for s in strings {
        seq.serialize_element(&s)?;
    }
    seq.end()
}

fn serialize_g1_seq_generic<S, P>(ps: &[Affine<P>], ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    let mut seq = ser.serialize_seq(Some(ps.len()))?;
    for p in ps {
        seq.serialize_element(&g1_to_strings(p))?;
    }
    seq.end()
}

fn serialize_g2_generic<S, Q, P>(p: &Affine<P>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    Q: QuadExtConfig,
    Q::BaseField: PrimeField<BigInt = BigInt<4>>,
    P: SWCurveConfig<BaseField = QuadExtField<Q>>,
{
    let strings = g2_to_strings(p);
    let mut seq = ser.serialize_seq(Some(strings.len()))?;
    for s in &strings {
        seq.serialize_element(s)?;
    }
    seq.end()
}

/// Parses a G1 point from (Jacobian) projective coordinate strings and validates it.
fn g1_from_strings<P>(x: &str, y: &str, z: &str) -> Result<Affine<P>, SerdeCompatError>
where
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    let x = parse_field::<P::BaseField>(x)?;
    let y = parse_field::<P::BaseField>(y)?;
    let z = parse_field::<P::BaseField>(z)?;
    if z.is_zero() {
        return Ok(Affine::identity());
    }
    check_point(Projective::<P>::new_unchecked(x, y, z).into_affine())
}

/// Parses a G2 point from three pairs of coordinate strings and validates it.
fn g2_from_strings<Q, P>(coords: &[[String; 2]; 3]) -> Result<Affine<P>, SerdeCompatError>
where
    Q: QuadExtConfig,
    Q::BaseField: PrimeField<BigInt = BigInt<4>>,
    P: SWCurveConfig<BaseField = QuadExtField<Q>>,
{
    let quad = |pair: &[String; 2]| -> Result<QuadExtField<Q>, SerdeCompatError> {
        Ok(QuadExtField::new(
            parse_field(&pair[0])?,
            parse_field(&pair[1])?,
        ))
    };
    let x = quad(&coords[0])?;
    let y = quad(&coords[1])?;
    let z = quad(&coords[2])?;
    if z.is_zero() {
        return Ok(Affine::identity());
    }
    check_point(Projective::<P>::new_unchecked(x, y, z).into_affine())
}

struct G1Visitor<P>(PhantomData<P>);

struct G2Visitor<Q, P>(PhantomData<(Q, P)>);

impl<'de, P> de::Visitor<'de> for G1Visitor<P>
where
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    type Value = Affine<P>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of 3 strings, representing a projective point on G1")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut coords = Vec::with_capacity(3);
        while let Some(Numeric(s)) = seq.next_element::<Numeric>()? {
            coords.push(s);
        }
        if coords.len() != 3 {
            return Err(de::Error::invalid_length(coords.len(), &self));
        }
        g1_from_strings::<P>(&coords[0], &coords[1], &coords[2]).map_err(de::Error::custom)
    }
}

impl<'de, Q, P> de::Visitor<'de> for G2Visitor<Q, P>
where
    Q: QuadExtConfig,
    Q::BaseField: PrimeField<BigInt = BigInt<4>>,
    P: SWCurveConfig<BaseField = QuadExtField<Q>>,
{
    type Value = Affine<P>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(
            "a sequence of 3 sequences of two strings, representing a projective point on G2",
        )
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut coords: Vec<[String; 2]> = Vec::with_capacity(3);
        while let Some(pair) = seq.next_element::<Vec<Numeric>>()? {
            let [c0, c1]: [Numeric; 2] = pair.try_into().map_err(|pair: Vec<Numeric>| {
                de::Error::custom(format!(
                    "G2 coordinates need two field elements, but got {}",
                    pair.len()
                ))
            })?;
            coords.push([c0.0, c1.0]);
        }
        let coords: [[String; 2]; 3] = coords
            .try_into()
            .map_err(|coords: Vec<[String; 2]>| de::Error::invalid_length(coords.len(), &self))?;
        g2_from_strings::<Q, P>(&coords).map_err(de::Error::custom)
    }
}

struct G1SeqVisitor<P>(PhantomData<P>);

impl<'de, P> de::Visitor<'de> for G1SeqVisitor<P>
where
    P: SWCurveConfig,
    P::BaseField: PrimeField<BigInt = BigInt<4>>,
{
    type Value = Vec<Affine<P>>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of projective points on G1")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut values = vec![];
        while let Some(point) = seq.next_element::<Vec<Numeric>>()? {
            if point.len() != 3 {
                return Err(de::Error::invalid_length(point.len(), &self));
            }
            values.push(
                g1_from_strings::<P>(&point[0].0, &point[1].0, &point[2].0)
                    .map_err(de::Error::custom)?,
            );
        }
        Ok(values)
    }
}
