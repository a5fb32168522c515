use nalgebra::Matrix4;

/// [Navigation] filter [DilutionOfPrecision]
///
/// [Navigation]: super::Navigation
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub(crate) struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Creates new [DilutionOfPrecision] from (HᵗH)⁻¹.
    pub fn new(q: &Matrix4<f64>) -> Self {
        Self {
            gdop: q.trace().sqrt(),
            pdop: (q[(0, 0)] + q[(1, 1)] + q[(2, 2)]).sqrt(),
            tdop: q[(3, 3)].sqrt(),
        }
    }

    /// DOPs of a degenerate geometry
    pub fn undefined() -> Self {
        Self {
            gdop: f64::NAN,
            pdop: f64::NAN,
            tdop: f64::NAN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity() {
        let dop = DilutionOfPrecision::new(&Matrix4::identity());
        assert_eq!(dop.gdop, 2.0);
        assert_eq!(dop.pdop, 3.0_f64.sqrt());
        assert_eq!(dop.tdop, 1.0);
    }
}
