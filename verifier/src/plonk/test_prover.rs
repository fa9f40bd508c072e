//! A minimal PLONK prover producing snarkjs-layout proofs, used to test the verifier
//! against honest proofs.
//!
//! The setup knows τ, so KZG commitments are `P(τ)·G1`. The circuit is Multiplier3
//! (`ab = a·b`, `abc = ab·c`, both public) on a domain of size 8:
//!
//! | row | a   | b | c   | gate                |
//! |-----|-----|---|-----|---------------------|
//! | 0   | ab  | 0 | 0   | public input 1      |
//! | 1   | abc | 0 | 0   | public input 2      |
//! | 2   | a   | b | ab  | `qM = 1, qO = -1`   |
//! | 3   | ab  | c | abc | `qM = 1, qO = -1`   |
//! | 4-7 | 0   | 0 | 0   | empty               |
//!
//! No blinding is applied.

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{AdditiveGroup, Field, UniformRand, Zero};
use ark_poly::{
    DenseUVPolynomial, EvaluationDomain, Polynomial, Radix2EvaluationDomain,
    univariate::DensePolynomial,
};
use circom_types::plonk::{PlonkProof, VerificationKey};

use super::Transcript;

type Poly = DensePolynomial<Fr>;

const POWER: usize = 3;
const N: usize = 1 << POWER;
const K: [u64; 3] = [1, 2, 3];

/// Copy constraints as cycles of `(column, row)` positions.
const CYCLES: [&[(usize, usize)]; 2] = [&[(0, 0), (2, 2), (0, 3)], &[(0, 1), (2, 3)]];

pub(crate) struct Setup {
    pub(crate) vk: VerificationKey,
    tau: Fr,
    domain: Radix2EvaluationDomain<Fr>,
    qm: Poly,
    ql: Poly,
    qr: Poly,
    qo: Poly,
    qc: Poly,
    sigma: [Vec<Fr>; 3],
    s: [Poly; 3],
}

fn scale(p: &Poly, s: Fr) -> Poly {
    Poly::from_coefficients_vec(p.coeffs.iter().map(|c| *c * s).collect())
}

fn constant(c: Fr) -> Poly {
    Poly::from_coefficients_vec(vec![c])
}

/// `p(ωX)`
fn shift(p: &Poly, omega: Fr) -> Poly {
    let mut power = Fr::ONE;
    let mut coeffs = Vec::with_capacity(p.coeffs.len());
    for c in &p.coeffs {
        coeffs.push(*c * power);
        power *= omega;
    }
    Poly::from_coefficients_vec(coeffs)
}

fn product(factors: &[Poly]) -> Poly {
    factors
        .iter()
        .fold(constant(Fr::ONE), |acc, factor| &acc * factor)
}

/// Exact division by `Xⁿ − 1`.
fn divide_by_vanishing(p: &Poly, n: usize) -> Poly {
    let mut rem = p.coeffs.clone();
    let mut quotient = vec![Fr::ZERO; rem.len().saturating_sub(n)];
    for k in (n..rem.len()).rev() {
        let c = rem[k];
        quotient[k - n] = c;
        rem[k - n] += c;
        rem[k] = Fr::ZERO;
    }
    assert!(rem.iter().all(Zero::is_zero), "numerator is not divisible by Z_H");
    Poly::from_coefficients_vec(quotient)
}

/// Exact division by `X − z`.
fn divide_by_linear(p: &Poly, z: Fr) -> Poly {
    let coeffs = &p.coeffs;
    if coeffs.is_empty() {
        return Poly::zero();
    }
    let mut quotient = vec![Fr::ZERO; coeffs.len() - 1];
    let mut carry = Fr::ZERO;
    for k in (1..coeffs.len()).rev() {
        carry = coeffs[k] + carry * z;
        quotient[k - 1] = carry;
    }
    assert!((coeffs[0] + carry * z).is_zero(), "polynomial does not vanish at z");
    Poly::from_coefficients_vec(quotient)
}

fn chunk(t: &Poly, i: usize) -> Poly {
    let coeffs = t
        .coeffs
        .iter()
        .skip(i * N)
        .take(N)
        .copied()
        .collect::<Vec<_>>();
    Poly::from_coefficients_vec(coeffs)
}

fn interpolate_on(domain: &Radix2EvaluationDomain<Fr>, evals: &[Fr]) -> Poly {
    Poly::from_coefficients_vec(domain.ifft(evals))
}

impl Setup {
    pub(crate) fn new() -> Self {
        let mut rng = ark_std::test_rng();
        let tau = Fr::rand(&mut rng);
        let domain = Radix2EvaluationDomain::<Fr>::new(N).expect("2^3 fits the two-adicity");

        let one = Fr::ONE;
        let zero = Fr::ZERO;
        let mut ql = vec![zero; N];
        let mut qm = vec![zero; N];
        let mut qo = vec![zero; N];
        ql[..2].fill(one);
        qm[2..4].fill(one);
        qo[2..4].fill(-one);

        let label = |col: usize, row: usize| Fr::from(K[col]) * domain.element(row);
        let mut sigma: [Vec<Fr>; 3] =
            std::array::from_fn(|col| (0..N).map(|row| label(col, row)).collect());
        for cycle in CYCLES {
            for (i, &(col, row)) in cycle.iter().enumerate() {
                let (next_col, next_row) = cycle[(i + 1) % cycle.len()];
                sigma[col][row] = label(next_col, next_row);
            }
        }
        let s = sigma.each_ref().map(|evals| interpolate_on(&domain, evals));
        let qm = interpolate_on(&domain, &qm);
        let ql = interpolate_on(&domain, &ql);
        let qo = interpolate_on(&domain, &qo);
        let w = domain.element(1);

        let mut setup = Self {
            vk: VerificationKey {
                protocol: "plonk".to_owned(),
                curve: "bn128".to_owned(),
                n_public: 2,
                power: POWER,
                k1: Fr::from(K[1]),
                k2: Fr::from(K[2]),
                qm: G1Affine::zero(),
                ql: G1Affine::zero(),
                qr: G1Affine::zero(),
                qo: G1Affine::zero(),
                qc: G1Affine::zero(),
                s1: G1Affine::zero(),
                s2: G1Affine::zero(),
                s3: G1Affine::zero(),
                x_2: (G2Affine::generator() * tau).into_affine(),
                w,
            },
            tau,
            domain,
            qm,
            ql,
            qr: Poly::zero(),
            qo,
            qc: Poly::zero(),
            sigma,
            s,
        };
        setup.vk.qm = setup.commit(&setup.qm);
        setup.vk.ql = setup.commit(&setup.ql);
        setup.vk.qr = setup.commit(&setup.qr);
        setup.vk.qo = setup.commit(&setup.qo);
        setup.vk.qc = setup.commit(&setup.qc);
        setup.vk.s1 = setup.commit(&setup.s[0]);
        setup.vk.s2 = setup.commit(&setup.s[1]);
        setup.vk.s3 = setup.commit(&setup.s[2]);
        setup
    }

    fn commit(&self, p: &Poly) -> G1Affine {
        (G1Affine::generator() * p.evaluate(&self.tau)).into_affine()
    }

    fn interpolate(&self, evals: &[Fr]) -> Poly {
        interpolate_on(&self.domain, evals)
    }

    fn lagrange_first_poly(&self) -> Poly {
        let mut evals = vec![Fr::ZERO; N];
        evals[0] = Fr::ONE;
        self.interpolate(&evals)
    }

    /// `PI(X) = −Σ xᵢ·Lᵢ(X)`
    fn public_input_poly_of(&self, public: &[Fr]) -> Poly {
        let mut evals = vec![Fr::ZERO; N];
        for (e, x) in evals.iter_mut().zip(public) {
            *e = -*x;
        }
        self.interpolate(&evals)
    }

    /// L₁(x) computed by interpolation.
    pub(crate) fn lagrange_first(&self, x: Fr) -> Fr {
        self.lagrange_first_poly().evaluate(&x)
    }

    /// PI(x) computed by interpolation.
    pub(crate) fn public_input_poly(&self, public: &[Fr], x: Fr) -> Fr {
        self.public_input_poly_of(public).evaluate(&x)
    }

    /// Proves Multiplier3 for the private inputs `a, b, c`. Returns the proof and the
    /// public signals `[a·b, a·b·c]`.
    pub(crate) fn prove_multiplier3(&self, a: Fr, b: Fr, c: Fr) -> (PlonkProof, Vec<Fr>) {
        let zero = Fr::ZERO;
        let ab = a * b;
        let abc = ab * c;
        let public = vec![ab, abc];
        let mut wires = [vec![zero; N], vec![zero; N], vec![zero; N]];
        wires[0][..4].copy_from_slice(&[ab, abc, a, ab]);
        wires[1][..4].copy_from_slice(&[zero, zero, b, c]);
        wires[2][..4].copy_from_slice(&[zero, zero, ab, abc]);
        let [pa, pb, pc] = wires.each_ref().map(|w| self.interpolate(w));
        let (ca, cb, cc) = (self.commit(&pa), self.commit(&pb), self.commit(&pc));

        let mut transcript = Transcript::new();
        let (beta, gamma) = transcript
            .beta_gamma(&self.vk, &public, [&ca, &cb, &cc])
            .unwrap();

        // grand product
        let k = K.map(Fr::from);
        let mut z_evals = vec![Fr::ONE; N];
        let mut acc = Fr::ONE;
        for i in 0..N {
            let x = self.domain.element(i);
            let mut num = Fr::ONE;
            let mut den = Fr::ONE;
            for j in 0..3 {
                num *= wires[j][i] + beta * k[j] * x + gamma;
                den *= wires[j][i] + beta * self.sigma[j][i] + gamma;
            }
            acc *= num * den.inverse().unwrap();
            if i + 1 < N {
                z_evals[i + 1] = acc;
            }
        }
        assert_eq!(acc, Fr::ONE, "copy constraints are violated");
        let pz = self.interpolate(&z_evals);
        let cz = self.commit(&pz);
        let alpha = transcript.alpha(&cz).unwrap();

        // quotient
        let omega = self.domain.element(1);
        let l1 = self.lagrange_first_poly();
        let pi = self.public_input_poly_of(&public);
        let mut gate = product(&[self.qm.clone(), pa.clone(), pb.clone()]);
        gate = &gate + &(&self.ql * &pa);
        gate = &gate + &(&self.qr * &pb);
        gate = &gate + &(&self.qo * &pc);
        gate = &(&gate + &self.qc) + &pi;
        let wire_term = |w: &Poly, shift_by: Poly| &(w + &shift_by) + &constant(gamma);
        let identity = |kj: Fr| Poly::from_coefficients_vec(vec![Fr::ZERO, beta * kj]);
        let perm1 = product(&[
            wire_term(&pa, identity(k[0])),
            wire_term(&pb, identity(k[1])),
            wire_term(&pc, identity(k[2])),
            pz.clone(),
        ]);
        let perm2 = product(&[
            wire_term(&pa, scale(&self.s[0], beta)),
            wire_term(&pb, scale(&self.s[1], beta)),
            wire_term(&pc, scale(&self.s[2], beta)),
            shift(&pz, omega),
        ]);
        let boundary = &(&pz - &constant(Fr::ONE)) * &l1;
        let numerator =
            &(&gate + &scale(&(&perm1 - &perm2), alpha)) + &scale(&boundary, alpha.square());
        let t = divide_by_vanishing(&numerator, N);
        assert!(t.coeffs.len() <= 3 * N);
        let [t1, t2, t3] = [0, 1, 2].map(|i| chunk(&t, i));
        let (ct1, ct2, ct3) = (self.commit(&t1), self.commit(&t2), self.commit(&t3));
        let xi = transcript.xi([&ct1, &ct2, &ct3]).unwrap();

        // evaluations
        let xiw = xi * omega;
        let eval_a = pa.evaluate(&xi);
        let eval_b = pb.evaluate(&xi);
        let eval_c = pc.evaluate(&xi);
        let eval_s1 = self.s[0].evaluate(&xi);
        let eval_s2 = self.s[1].evaluate(&xi);
        let eval_zw = pz.evaluate(&xiw);
        let v = transcript
            .v(&[eval_a, eval_b, eval_c, eval_s1, eval_s2, eval_zw])
            .unwrap();

        // linearisation and openings
        let xin = xi.pow([N as u64]);
        let zh = xin - Fr::ONE;
        let l1_xi = l1.evaluate(&xi);
        let alpha2 = alpha.square();
        let e3a = eval_a + beta * eval_s1 + gamma;
        let e3b = eval_b + beta * eval_s2 + gamma;
        let e3c = eval_c + gamma;
        let r0 = pi.evaluate(&xi) - l1_xi * alpha2 - alpha * e3a * e3b * e3c * eval_zw;
        let d2a = eval_a + beta * xi + gamma;
        let d2b = eval_b + beta * k[1] * xi + gamma;
        let d2c = eval_c + beta * k[2] * xi + gamma;
        let z_coeff = alpha * d2a * d2b * d2c + l1_xi * alpha2;
        let s3_coeff = alpha * beta * eval_zw * e3a * e3b;
        let quotient_at = &(&t1 + &scale(&t2, xin)) + &scale(&t3, xin.square());
        let r = [
            scale(&self.qm, eval_a * eval_b),
            scale(&self.ql, eval_a),
            scale(&self.qr, eval_b),
            scale(&self.qo, eval_c),
            self.qc.clone(),
            scale(&pz, z_coeff),
            scale(&self.s[2], -s3_coeff),
            scale(&quotient_at, -zh),
            constant(r0),
        ]
        .iter()
        .fold(Poly::zero(), |acc, term| &acc + term);
        assert!(r.evaluate(&xi).is_zero(), "linearisation does not vanish at xi");

        let opened = [
            (&pa, eval_a),
            (&pb, eval_b),
            (&pc, eval_c),
            (&self.s[0], eval_s1),
            (&self.s[1], eval_s2),
        ];
        let batched = opened
            .iter()
            .zip(v)
            .fold(r, |acc, ((p, eval), vi)| {
                &acc + &scale(&(*p - &constant(*eval)), vi)
            });
        let wxi = divide_by_linear(&batched, xi);
        let wxiw = divide_by_linear(&(&pz - &constant(eval_zw)), xiw);

        let proof = PlonkProof {
            a: ca,
            b: cb,
            c: cc,
            z: cz,
            t1: ct1,
            t2: ct2,
            t3: ct3,
            wxi: self.commit(&wxi),
            wxiw: self.commit(&wxiw),
            eval_a,
            eval_b,
            eval_c,
            eval_s1,
            eval_s2,
            eval_zw,
            protocol: "plonk".to_owned(),
            curve: "bn128".to_owned(),
        };
        (proof, public)
    }
}
