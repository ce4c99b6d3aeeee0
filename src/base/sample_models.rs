use super::{Attributes, Elem, Member, Model, Node, ParamBeam, ParamJoint, ParamTruss};

/// Holds sample structural models for testing
pub struct SampleModels {}

impl SampleModels {
    /// Returns a model with a single horizontal truss member
    ///
    /// ```text
    /// 0--------1   → x
    ///    [0]
    /// ```
    pub fn one_truss_2d() -> (Model, Attributes) {
        let model = Model {
            ndim: 2,
            nodes: vec![
                Node { id: 0, coords: vec![0.0, 0.0] },
                Node { id: 1, coords: vec![1.0, 0.0] },
            ],
            members: vec![Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1],
            }],
        };
        let attributes = Attributes::from([(1, Elem::Truss(ParamTruss::sample_linear_elastic()))]);
        (model, attributes)
    }

    /// Returns a cantilever beam with a single member of length 2
    ///
    /// ```text
    /// 0========1   → x
    ///    [0]
    /// ```
    pub fn cantilever_beam_2d() -> (Model, Attributes) {
        let model = Model {
            ndim: 2,
            nodes: vec![
                Node { id: 0, coords: vec![0.0, 0.0] },
                Node { id: 1, coords: vec![2.0, 0.0] },
            ],
            members: vec![Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1],
            }],
        };
        let attributes = Attributes::from([(1, Elem::Beam(ParamBeam::sample()))]);
        (model, attributes)
    }

    /// Returns a single panel-zone joint with width 2 and height 2
    ///
    /// The four nodes sit at the mid-edges of the panel
    /// (0 = left, 1 = bottom, 2 = right, 3 = top).
    ///
    /// ```text
    ///        3
    ///    +---o---+
    ///    |       |
    ///  0 o   +   o 2   → x
    ///    |       |
    ///    +---o---+
    ///        1
    /// ```
    pub fn one_joint_2d(young: f64) -> (Model, Attributes) {
        let model = Model {
            ndim: 2,
            nodes: vec![
                Node { id: 0, coords: vec![-1.0, 0.0] },
                Node { id: 1, coords: vec![0.0, -1.0] },
                Node { id: 2, coords: vec![1.0, 0.0] },
                Node { id: 3, coords: vec![0.0, 1.0] },
            ],
            members: vec![Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1, 2, 3],
            }],
        };
        let attributes = Attributes::from([(1, Elem::Joint(ParamJoint::sample_elastic(young)))]);
        (model, attributes)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
