use glam::Vec2;
use lottie_data::model::{BezierPath, Property, Value, Vector};

pub trait Interpolatable: Sized + Clone {
    /// Blends `self` towards `other` by `t`. Returns `None` when the two
    /// values have incompatible shapes and cannot be blended.
    fn lerp(&self, other: &Self, t: f32) -> Option<Self>;
}

fn lerp_component(a: f32, b: f32, t: f32) -> f32 {
    let res = a + (b - a) * t;
    if res.is_nan() {
        a
    } else {
        res
    }
}

fn lerp_point(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp_component(a[0], b[0], t), lerp_component(a[1], b[1], t)]
}

impl Interpolatable for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        Some(lerp_component(*self, *other, t))
    }
}

impl Interpolatable for Vector {
    fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        if other.is_empty() {
            return Some(self.clone());
        }
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.iter()
                .zip(other.iter())
                .map(|(a, b)| lerp_component(*a, *b, t))
                .collect(),
        )
    }
}

impl Interpolatable for BezierPath {
    fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        // No vertex-count morphing
        if self.v.len() != other.v.len() {
            return None;
        }

        let n = self.v.len();
        let tangent = |list: &[[f32; 2]], idx: usize| list.get(idx).copied().unwrap_or([0.0, 0.0]);

        let mut out = BezierPath {
            c: self.c,
            v: Vec::with_capacity(n),
            i: Vec::with_capacity(n),
            o: Vec::with_capacity(n),
        };
        for idx in 0..n {
            out.v.push(lerp_point(self.v[idx], other.v[idx], t));
            out.i.push(lerp_point(
                tangent(&self.i, idx),
                tangent(&other.i, idx),
                t,
            ));
            out.o.push(lerp_point(
                tangent(&self.o, idx),
                tangent(&other.o, idx),
                t,
            ));
        }
        Some(out)
    }
}

pub struct Animator;

impl Animator {
    /// Samples `prop` at `frame`, or `None` when it carries no value at all
    /// (missing `k` or an empty keyframe list).
    pub fn sample<T: Interpolatable>(prop: &Property<T>, frame: f32) -> Option<T> {
        match &prop.k {
            Value::Default => None,
            Value::Static(v) => Some(v.clone()),
            Value::Animated(keyframes) => {
                let first = keyframes.first()?;
                let last = keyframes.last()?;

                if frame <= first.t {
                    return Some(first.s.clone());
                }
                if frame >= last.t {
                    return Some(last.s.clone());
                }

                // First keyframe with t > frame; the segment is [idx-1, idx].
                let idx = keyframes.partition_point(|kf| kf.t <= frame);
                if idx == 0 || idx >= keyframes.len() {
                    return Some(first.s.clone());
                }
                let cur = &keyframes[idx - 1];
                let next = &keyframes[idx];

                let duration = next.t - cur.t;
                if duration <= 0.0 {
                    return Some(cur.s.clone());
                }
                let local_t = (frame - cur.t) / duration;

                Some(
                    cur.s
                        .lerp(&next.s, local_t)
                        .unwrap_or_else(|| cur.s.clone()),
                )
            }
        }
    }

    /// Samples `prop` at `frame`, falling back to `default` when it has no
    /// value.
    pub fn evaluate<T: Interpolatable>(prop: &Property<T>, frame: f32, default: T) -> T {
        Self::sample(prop, frame).unwrap_or(default)
    }

    /// Samples a vector property as a 2D point, reading missing components
    /// from `default`.
    pub fn vec2(prop: &Property<Vector>, frame: f32, default: Vec2) -> Vec2 {
        match Self::sample(prop, frame) {
            Some(v) => Vec2::new(
                v.first().copied().unwrap_or(default.x),
                v.get(1).copied().unwrap_or(default.y),
            ),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::Keyframe;

    fn scalar_prop(frames: &[(f32, f32)]) -> Property<f32> {
        Property::animated(
            frames
                .iter()
                .map(|&(t, s)| Keyframe::new(t, s))
                .collect(),
        )
    }

    #[test]
    fn test_animator_resolve_binary_search() {
        let prop = scalar_prop(&[(0.0, 0.0), (10.0, 10.0), (20.0, 30.0)]);

        // Exact matches
        assert_eq!(Animator::evaluate(&prop, 0.0, -1.0), 0.0);
        assert_eq!(Animator::evaluate(&prop, 10.0, -1.0), 10.0);
        assert_eq!(Animator::evaluate(&prop, 20.0, -1.0), 30.0);

        // Clamped
        assert_eq!(Animator::evaluate(&prop, -5.0, -1.0), 0.0);
        assert_eq!(Animator::evaluate(&prop, 25.0, -1.0), 30.0);

        // Mid-segment
        assert_eq!(Animator::evaluate(&prop, 5.0, -1.0), 5.0);
        assert_eq!(Animator::evaluate(&prop, 15.0, -1.0), 20.0);
    }

    #[test]
    fn test_interpolates_against_next_start_not_cached_end() {
        let mut kf = Keyframe::new(0.0, 0.0f32);
        kf.e = Some(1000.0);
        let prop = Property::animated(vec![kf, Keyframe::new(10.0, 100.0)]);
        assert_eq!(Animator::evaluate(&prop, 5.0, 0.0), 50.0);
    }

    #[test]
    fn test_static_and_default() {
        let fixed = Property::fixed(vec![1.0f32, 2.0]);
        assert_eq!(Animator::evaluate(&fixed, 99.0, vec![]), vec![1.0, 2.0]);

        let missing: Property<f32> = Property::default();
        assert_eq!(Animator::evaluate(&missing, 3.0, 7.0), 7.0);

        let empty: Property<f32> = Property::animated(vec![]);
        assert_eq!(Animator::evaluate(&empty, 3.0, 7.0), 7.0);
    }

    #[test]
    fn test_vector_dimension_mismatch_keeps_start() {
        let prop = Property::animated(vec![
            Keyframe::new(0.0, vec![0.0f32, 0.0]),
            Keyframe::new(10.0, vec![10.0f32, 10.0, 10.0]),
        ]);
        assert_eq!(Animator::evaluate(&prop, 5.0, vec![]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_nan_component_falls_back_to_start() {
        let prop = Property::animated(vec![
            Keyframe::new(0.0, vec![1.0f32, 2.0]),
            Keyframe::new(10.0, vec![f32::NAN, 4.0]),
        ]);
        assert_eq!(Animator::evaluate(&prop, 5.0, vec![]), vec![1.0, 3.0]);
    }

    #[test]
    fn test_path_morph_requires_matching_vertex_count() {
        let mut a = BezierPath::default();
        a.push([0.0, 0.0], [0.0, 0.0], [0.0, 0.0]);
        a.push([10.0, 0.0], [0.0, 0.0], [0.0, 0.0]);
        a.c = true;

        let mut b = BezierPath::default();
        b.push([0.0, 10.0], [0.0, 0.0], [2.0, 0.0]);
        b.push([10.0, 10.0], [0.0, 0.0], [0.0, 0.0]);

        let prop = Property::animated(vec![Keyframe::new(0.0, a.clone()), Keyframe::new(10.0, b)]);
        let mid = Animator::evaluate(&prop, 5.0, BezierPath::default());
        assert_eq!(mid.v, vec![[0.0, 5.0], [10.0, 5.0]]);
        assert_eq!(mid.o[0], [1.0, 0.0]);
        assert!(mid.c, "closed flag comes from the earlier keyframe");

        let mut c = BezierPath::default();
        c.push([5.0, 5.0], [0.0, 0.0], [0.0, 0.0]);
        let mismatched =
            Property::animated(vec![Keyframe::new(0.0, a.clone()), Keyframe::new(10.0, c)]);
        for frame in [0.5, 2.5, 7.25, 9.9] {
            assert_eq!(
                Animator::evaluate(&mismatched, frame, BezierPath::default()),
                a
            );
        }
    }

    #[test]
    fn test_vec2_reads_missing_components_from_default() {
        let prop = Property::fixed(vec![3.0f32]);
        assert_eq!(
            Animator::vec2(&prop, 0.0, Vec2::new(0.0, 9.0)),
            Vec2::new(3.0, 9.0)
        );
    }
}
