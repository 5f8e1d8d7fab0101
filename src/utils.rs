use crate::Vector;

/// Requires slices of equal length. The registered SQL functions check
/// dimensions before calling.
pub fn euclidean_distance(v1: &[f32], v2: &[f32]) -> f32 {
    debug_assert_eq!(v1.len(), v2.len(), "distance inputs must have equal length");
    v1.iter()
        .zip(v2.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f32>()
        .sqrt()
}

/// Requires slices of equal length. The registered SQL functions check
/// dimensions before calling.
pub fn inner_product(v1: &[f32], v2: &[f32]) -> f32 {
    debug_assert_eq!(v1.len(), v2.len(), "distance inputs must have equal length");
    v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum()
}

pub fn cosine_similarity(v1: &[f32], v2: &[f32]) -> f32 {
    let dot_product = inner_product(v1, v2);
    let norm1 = inner_product(v1, v1).sqrt();
    let norm2 = inner_product(v2, v2).sqrt();

    if norm1 == 0.0 || norm2 == 0.0 {
        0.0
    } else {
        dot_product / (norm1 * norm2)
    }
}

pub fn generate_random_vectors(dim: usize, num: usize) -> Vec<Vector> {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    (0..num)
        .map(|_| {
            Vector::new(
                (0..dim)
                    .map(|_| rng.gen_range(-1.0..1.0))
                    .collect()
            )
        })
        .collect()
}
