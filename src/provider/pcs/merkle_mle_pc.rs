//! Hash-based multilinear PCS
//!
//! The `2^m` evaluations are laid out as a matrix whose columns are indexed by the low
//! `⌈m/2⌉` index bits and whose rows by the remaining high bits. Every row is Reed-Solomon
//! encoded at rate `1/BLOWUP`, and the commitment is a Keccak256 Merkle root over the columns
//! of the encoded matrix.
//!
//! Since `eq(r, i) = eq(r_lo, col(i))·eq(r_hi, row(i))`, the evaluation at `r` is
//! `⟨eq(r_hi, ·)ᵀ·M, eq(r_lo, ·)⟩`. The argument sends the row combination `eq(r_hi, ·)ᵀ·M`
//! together with a random combination `γᵀ·M`, and opens transcript-chosen encoded columns.
//! The verifier checks that the encodings of both combinations agree with the same
//! combinations of every opened column. A combination that is not the honest one disagrees
//! with the committed codewords on most columns.
use crate::{
  errors::GkrError,
  math::Math,
  polys::{eq::EqPolynomial, univariate::UniPoly},
  traits::{
    Engine,
    pcs::{CommitmentTrait, PCSEngineTrait},
    transcript::{TranscriptEngineTrait, TranscriptReprTrait},
  },
};
use ff::PrimeField;
use itertools::izip;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::marker::PhantomData;

/// Domain tags to avoid cross-protocol collisions
const TAG_LEAF: &[u8] = b"mle/leaf";
const TAG_NODE: &[u8] = b"mle/node";
const TAG_POLY_COM: &[u8] = b"mle/poly_com";
const TAG_COMBINE: &[u8] = b"mle/combine";
const TAG_PROXIMITY_ROW: &[u8] = b"mle/proximity_row";
const TAG_EVAL_ROW: &[u8] = b"mle/eval_row";
const TAG_QUERY: &[u8] = b"mle/query";

/// log2 of the code's inverse rate
const BLOWUP_BITS: usize = 2;
const BLOWUP: usize = 1 << BLOWUP_BITS;

/// Number of encoded columns opened by default
pub const DEFAULT_NUM_QUERIES: usize = 64;

/// Commitment key for Hash-MLE PCS
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HashMleCommitmentKey {
  num_queries: usize,
}

/// Verifier key for Hash-MLE PCS
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HashMleVerifierKey {
  num_queries: usize,
}

/// A Merkle tree root (32-byte hash)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRoot([u8; 32]);

impl<F: PrimeField> TranscriptReprTrait<F> for MerkleRoot {
  fn to_transcript_scalars(&self) -> Vec<F> {
    self.0.to_transcript_scalars()
  }
}

/// Authentication path for a Merkle tree leaf
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
  /// leaf index within the committed array (0-based)
  pub leaf_index: u64,
  /// authentication path (sibling digests, bottom-up)
  pub siblings: Vec<[u8; 32]>,
}

/// Commitment for Hash-MLE PCS
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HashMleCommitment<E: Engine> {
  /// Root of the tree over the encoded columns
  root: MerkleRoot,
  _p: PhantomData<E>,
}

impl<E: Engine> TranscriptReprTrait<E::Scalar> for HashMleCommitment<E> {
  fn to_transcript_scalars(&self) -> Vec<E::Scalar> {
    self.root.to_transcript_scalars()
  }
}

impl<E: Engine> CommitmentTrait<E> for HashMleCommitment<E> {}

/// One opened column of the encoded matrix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ColumnOpening<E: Engine> {
  values: Vec<E::Scalar>,
  path: MerklePath,
}

/// Evaluation argument: two row combinations and the opened columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct HashMleEvaluationArgument<E: Engine> {
  /// `γᵀ·M` for transcript-chosen `γ`
  proximity_row: Vec<E::Scalar>,
  /// `eq(r_hi, ·)ᵀ·M`
  eval_row: Vec<E::Scalar>,
  columns: Vec<ColumnOpening<E>>,
}

fn keccak256(bytes: &[u8]) -> [u8; 32] {
  let mut h = Keccak256::new();
  h.update(bytes);
  h.finalize().into()
}

fn leaf_hash<F: PrimeField>(column: &[F]) -> [u8; 32] {
  let mut h = Keccak256::new();
  h.update(TAG_LEAF);
  for x in column {
    h.update(x.to_repr().as_ref());
  }
  h.finalize().into()
}

fn node_hash(l: &[u8; 32], r: &[u8; 32]) -> [u8; 32] {
  let mut v = Vec::with_capacity(TAG_NODE.len() + 64);
  v.extend_from_slice(TAG_NODE);
  v.extend_from_slice(l);
  v.extend_from_slice(r);
  keccak256(&v)
}

#[derive(Clone)]
struct MerkleTree {
  layers: Vec<Vec<[u8; 32]>>, // layers[0] == leaves, layers.last()[0] == root
}

impl MerkleTree {
  fn from_leaves(leaves: Vec<[u8; 32]>) -> Self {
    debug_assert!(leaves.len().is_power_of_two());
    let mut layers = vec![leaves];
    while layers[layers.len() - 1].len() > 1 {
      let next = layers[layers.len() - 1]
        .par_chunks_exact(2)
        .map(|p| node_hash(&p[0], &p[1]))
        .collect::<Vec<_>>();
      layers.push(next);
    }
    Self { layers }
  }

  fn root(&self) -> MerkleRoot {
    MerkleRoot(self.layers[self.layers.len() - 1][0])
  }

  fn open(&self, leaf_index: usize) -> MerklePath {
    let mut idx = leaf_index;
    let mut siblings = Vec::with_capacity(self.layers.len() - 1);
    for layer in self.layers.iter().take(self.layers.len() - 1) {
      siblings.push(layer[idx ^ 1]);
      idx >>= 1;
    }
    MerklePath {
      leaf_index: leaf_index as u64,
      siblings,
    }
  }

  /// Checks `path` against `root` for a tree with `depth` levels above the leaves.
  fn verify(
    path: &MerklePath,
    expected_index: usize,
    depth: usize,
    leaf: &[u8; 32],
    root: &MerkleRoot,
  ) -> bool {
    if path.leaf_index != expected_index as u64 || path.siblings.len() != depth {
      return false;
    }
    let mut idx = expected_index;
    let mut cur = *leaf;
    for sib in &path.siblings {
      cur = if idx % 2 == 0 {
        node_hash(&cur, sib)
      } else {
        node_hash(sib, &cur)
      };
      idx >>= 1;
    }
    cur == root.0
  }
}

/// Number of (row, column) variables for a table in `m` variables.
fn split_vars(m: usize) -> (usize, usize) {
  let col_vars = m.div_ceil(2);
  (m - col_vars, col_vars)
}

/// Reed-Solomon encoding: `row` read as coefficients, evaluated at `0..BLOWUP·len`.
fn encode<F: PrimeField>(row: &[F]) -> Vec<F> {
  let poly = UniPoly::from_coeffs(row.to_vec());
  (0..row.len() * BLOWUP)
    .map(|j| poly.evaluate(&F::from(j as u64)))
    .collect()
}

/// `Σ_k coeffs[k]·rows[k]`, where row `k` is `table[k·width..(k+1)·width]`.
fn combine_rows<F: PrimeField>(table: &[F], width: usize, coeffs: &[F]) -> Vec<F> {
  table
    .chunks_exact(width)
    .zip(coeffs)
    .fold(vec![F::ZERO; width], |mut acc, (row, c)| {
      for (a, x) in acc.iter_mut().zip(row) {
        *a += *c * x;
      }
      acc
    })
}

fn inner_product<F: PrimeField>(a: &[F], b: &[F]) -> F {
  a.iter().zip(b).map(|(x, y)| *x * y).sum()
}

/// Maps a squeezed challenge to a position in a table of `n` entries.
fn query_index<F: PrimeField>(c: &F, n: usize) -> usize {
  let repr = c.to_repr();
  let mut limb = [0u8; 8];
  limb.copy_from_slice(&repr.as_ref()[..8]);
  (u64::from_le_bytes(limb) % n as u64) as usize
}

/// The row-encoded matrix and the Merkle tree over its columns.
struct EncodedMatrix<F: PrimeField> {
  rows: Vec<Vec<F>>,
  tree: MerkleTree,
}

impl<F: PrimeField> EncodedMatrix<F> {
  fn new(table: &[F]) -> Self {
    let (_, col_vars) = split_vars(table.len().log_2());
    let rows: Vec<Vec<F>> = table.par_chunks_exact(1 << col_vars).map(encode).collect();
    let width = rows[0].len();
    let leaves = (0..width)
      .into_par_iter()
      .map(|j| leaf_hash(&Self::column_of(&rows, j)))
      .collect();
    Self {
      rows,
      tree: MerkleTree::from_leaves(leaves),
    }
  }

  fn column_of(rows: &[Vec<F>], j: usize) -> Vec<F> {
    rows.iter().map(|row| row[j]).collect()
  }

  fn width(&self) -> usize {
    self.rows[0].len()
  }
}

/// Hash-based multilinear polynomial commitment scheme
#[derive(Clone, Debug)]
pub struct HashMlePCS<E: Engine> {
  _p: PhantomData<E>,
}

impl<E: Engine> HashMlePCS<E> {
  /// Creates keys that open `num_queries` encoded columns per evaluation.
  pub fn setup_with_queries(num_queries: usize) -> (HashMleCommitmentKey, HashMleVerifierKey) {
    (
      HashMleCommitmentKey { num_queries },
      HashMleVerifierKey { num_queries },
    )
  }

  fn squeeze_queries(
    transcript: &mut E::TE,
    num_queries: usize,
    n: usize,
  ) -> Result<Vec<usize>, GkrError> {
    Ok(
      transcript
        .squeeze_vec(num_queries, TAG_QUERY)?
        .iter()
        .map(|c| query_index(c, n))
        .collect(),
    )
  }

  /// Absorbs both row combinations and opens the columns they select.
  fn open_columns(
    ck: &HashMleCommitmentKey,
    transcript: &mut E::TE,
    matrix: &EncodedMatrix<E::Scalar>,
    proximity_row: Vec<E::Scalar>,
    eval_row: Vec<E::Scalar>,
  ) -> Result<HashMleEvaluationArgument<E>, GkrError> {
    transcript.absorb(TAG_PROXIMITY_ROW, &proximity_row.as_slice());
    transcript.absorb(TAG_EVAL_ROW, &eval_row.as_slice());
    let columns = Self::squeeze_queries(transcript, ck.num_queries, matrix.width())?
      .into_iter()
      .map(|j| ColumnOpening {
        values: EncodedMatrix::column_of(&matrix.rows, j),
        path: matrix.tree.open(j),
      })
      .collect();
    Ok(HashMleEvaluationArgument {
      proximity_row,
      eval_row,
      columns,
    })
  }
}

impl<E: Engine> PCSEngineTrait<E> for HashMlePCS<E> {
  type CommitmentKey = HashMleCommitmentKey;
  type VerifierKey = HashMleVerifierKey;
  type Commitment = HashMleCommitment<E>;
  type EvaluationArgument = HashMleEvaluationArgument<E>;
  type BatchEvaluationArgument = Vec<HashMleEvaluationArgument<E>>;

  fn setup(_label: &'static [u8], _n: usize) -> (Self::CommitmentKey, Self::VerifierKey) {
    Self::setup_with_queries(DEFAULT_NUM_QUERIES)
  }

  fn commit(_ck: &Self::CommitmentKey, v: &[E::Scalar]) -> Result<Self::Commitment, GkrError> {
    if !v.len().is_power_of_two() {
      return Err(GkrError::InvalidInputLength {
        reason: "HashMlePCS: vector len must be power of two".into(),
      });
    }
    Ok(HashMleCommitment {
      root: EncodedMatrix::new(v).tree.root(),
      _p: PhantomData,
    })
  }

  fn prove(
    ck: &Self::CommitmentKey,
    transcript: &mut E::TE,
    comm: &Self::Commitment,
    poly: &[E::Scalar],
    point: &[E::Scalar],
  ) -> Result<(E::Scalar, Self::EvaluationArgument), GkrError> {
    let n = poly.len();
    let m = point.len();
    if n != (1usize << m) {
      return Err(GkrError::InvalidInputLength {
        reason: format!(
          "HashMlePCS::prove expected {} elements, got {}",
          1usize << m,
          n
        ),
      });
    }

    let matrix = EncodedMatrix::new(poly);
    if matrix.tree.root() != comm.root {
      return Err(GkrError::InvalidInputLength {
        reason: "HashMlePCS::prove polynomial does not match the commitment".into(),
      });
    }

    let (row_vars, col_vars) = split_vars(m);
    let width = 1 << col_vars;
    transcript.absorb(TAG_POLY_COM, comm);
    let gamma = transcript.squeeze_vec(1 << row_vars, TAG_COMBINE)?;

    let proximity_row = combine_rows(poly, width, &gamma);
    let eval_row = combine_rows(
      poly,
      width,
      &EqPolynomial::evals_from_points(&point[col_vars..]),
    );
    let eval = inner_product(
      &eval_row,
      &EqPolynomial::evals_from_points(&point[..col_vars]),
    );

    let arg = Self::open_columns(ck, transcript, &matrix, proximity_row, eval_row)?;
    Ok((eval, arg))
  }

  fn verify(
    vk: &Self::VerifierKey,
    transcript: &mut E::TE,
    comm: &Self::Commitment,
    point: &[E::Scalar],
    eval: &E::Scalar,
    arg: &Self::EvaluationArgument,
  ) -> Result<(), GkrError> {
    let (row_vars, col_vars) = split_vars(point.len());
    let (num_rows, num_cols) = (1usize << row_vars, 1usize << col_vars);
    if arg.proximity_row.len() != num_cols
      || arg.eval_row.len() != num_cols
      || arg.columns.len() != vk.num_queries
      || arg.columns.iter().any(|c| c.values.len() != num_rows)
    {
      return Err(GkrError::InvalidInputLength {
        reason: "HashMlePCS::verify malformed argument".into(),
      });
    }

    let fail = |reason: &str| GkrError::CommitmentVerificationFailure {
      reason: format!("HashMlePCS: {reason}"),
    };

    let eq_rows = EqPolynomial::evals_from_points(&point[col_vars..]);
    let eq_cols = EqPolynomial::evals_from_points(&point[..col_vars]);
    if inner_product(&arg.eval_row, &eq_cols) != *eval {
      return Err(fail("row combination does not match the claimed evaluation"));
    }

    transcript.absorb(TAG_POLY_COM, comm);
    let gamma = transcript.squeeze_vec(num_rows, TAG_COMBINE)?;
    transcript.absorb(TAG_PROXIMITY_ROW, &arg.proximity_row.as_slice());
    transcript.absorb(TAG_EVAL_ROW, &arg.eval_row.as_slice());
    let width = num_cols * BLOWUP;
    let queries = Self::squeeze_queries(transcript, vk.num_queries, width)?;

    let encoded_proximity = encode(&arg.proximity_row);
    let encoded_eval = encode(&arg.eval_row);
    for (j, column) in izip!(queries, &arg.columns) {
      if !MerkleTree::verify(
        &column.path,
        j,
        col_vars + BLOWUP_BITS,
        &leaf_hash(&column.values),
        &comm.root,
      ) {
        return Err(fail("invalid authentication path"));
      }
      if inner_product(&column.values, &gamma) != encoded_proximity[j] {
        return Err(fail("committed rows are not close to codewords"));
      }
      if inner_product(&column.values, &eq_rows) != encoded_eval[j] {
        return Err(fail("row combination disagrees with an opened column"));
      }
    }

    Ok(())
  }

  fn batch_prove(
    ck: &Self::CommitmentKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    polys: &[Vec<E::Scalar>],
    point: &[E::Scalar],
  ) -> Result<(Vec<E::Scalar>, Self::BatchEvaluationArgument), GkrError> {
    if comms.len() != polys.len() {
      return Err(GkrError::InvalidInputLength {
        reason: "HashMlePCS: number of commitments and polynomials differ".into(),
      });
    }
    let (evals, args): (Vec<_>, Vec<_>) = comms
      .iter()
      .zip(polys.iter())
      .map(|(comm, poly)| Self::prove(ck, transcript, comm, poly, point))
      .collect::<Result<Vec<_>, _>>()?
      .into_iter()
      .unzip();
    Ok((evals, args))
  }

  fn batch_verify(
    vk: &Self::VerifierKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    point: &[E::Scalar],
    evals: &[E::Scalar],
    arg: &Self::BatchEvaluationArgument,
  ) -> Result<(), GkrError> {
    if comms.len() != evals.len() || comms.len() != arg.len() {
      return Err(GkrError::InvalidInputLength {
        reason: "HashMlePCS: batch sizes differ".into(),
      });
    }
    for (comm, eval, a) in izip!(comms, evals, arg) {
      Self::verify(vk, transcript, comm, point, eval, a)?;
    }
    Ok(())
  }
}
