/// Result of a nearest-hit query, `t` is infinite on a miss.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    pub t: f32,
    pub primitive: Option<usize>,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            primitive: None,
        }
    }
}

impl Intersection {
    pub fn is_hit(&self) -> bool {
        self.primitive.is_some() && self.t.is_finite()
    }
}
