use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds a structural node (2D)
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Node {
    /// Identification number (= index in the array of nodes)
    pub id: usize,

    /// Coordinates (2 components)
    pub coords: Vec<f64>,
}

/// Holds a structural member connecting nodes
///
/// The attribute selects the element formulation and parameters; see [crate::base::Attributes]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Member {
    /// Identification number (= index in the array of members)
    pub id: usize,

    /// Attribute number mapping to element parameters
    pub attribute: usize,

    /// Connected node ids (2 for truss/beam, 4 for joint)
    pub points: Vec<usize>,
}

/// Holds the structural model: nodes and members
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Model {
    /// Space dimension (always 2 for now)
    pub ndim: usize,

    /// All nodes
    pub nodes: Vec<Node>,

    /// All members
    pub members: Vec<Member>,
}

impl Model {
    /// Validates the model, capturing input errors before any analysis starts
    ///
    /// Checks: sequential ids, coordinate dimension, node ids within bounds,
    /// and non-degenerate two-node members.
    pub fn validate(&self) -> Result<(), StrError> {
        if self.ndim != 2 {
            return Err("ndim must be 2");
        }
        if self.nodes.is_empty() {
            return Err("there are no nodes in the model");
        }
        if self.members.is_empty() {
            return Err("there are no members in the model");
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id != i {
                return Err("node ids must be sequential");
            }
            if node.coords.len() != self.ndim {
                return Err("node has wrong number of coordinates");
            }
        }
        for (i, member) in self.members.iter().enumerate() {
            if member.id != i {
                return Err("member ids must be sequential");
            }
            for p in &member.points {
                if *p >= self.nodes.len() {
                    return Err("member point id is out-of-bounds");
                }
            }
            if member.points.len() == 2 {
                let a = &self.nodes[member.points[0]].coords;
                let b = &self.nodes[member.points[1]].coords;
                let dx = b[0] - a[0];
                let dy = b[1] - a[1];
                if f64::sqrt(dx * dx + dy * dy) < 1e-12 {
                    return Err("two-node member has zero length");
                }
            }
        }
        Ok(())
    }

    /// Computes the distance between two nodes
    pub fn distance(&self, a: usize, b: usize) -> Result<f64, StrError> {
        if a >= self.nodes.len() || b >= self.nodes.len() {
            return Err("cannot compute distance because node id is out-of-bounds");
        }
        let ca = &self.nodes[a].coords;
        let cb = &self.nodes[b].coords;
        let dx = cb[0] - ca[0];
        let dy = cb[1] - ca[1];
        Ok(f64::sqrt(dx * dx + dy * dy))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Member, Model, Node};

    fn two_node_model() -> Model {
        Model {
            ndim: 2,
            nodes: vec![
                Node { id: 0, coords: vec![0.0, 0.0] },
                Node { id: 1, coords: vec![3.0, 4.0] },
            ],
            members: vec![Member {
                id: 0,
                attribute: 1,
                points: vec![0, 1],
            }],
        }
    }

    #[test]
    fn validate_works() {
        let model = two_node_model();
        assert_eq!(model.validate(), Ok(()));
    }

    #[test]
    fn validate_captures_errors() {
        let mut model = two_node_model();
        model.ndim = 3;
        assert_eq!(model.validate().err(), Some("ndim must be 2"));

        let mut model = two_node_model();
        model.nodes.clear();
        assert_eq!(model.validate().err(), Some("there are no nodes in the model"));

        let mut model = two_node_model();
        model.members.clear();
        assert_eq!(model.validate().err(), Some("there are no members in the model"));

        let mut model = two_node_model();
        model.nodes[1].id = 7;
        assert_eq!(model.validate().err(), Some("node ids must be sequential"));

        let mut model = two_node_model();
        model.nodes[0].coords = vec![0.0];
        assert_eq!(model.validate().err(), Some("node has wrong number of coordinates"));

        let mut model = two_node_model();
        model.members[0].points = vec![0, 5];
        assert_eq!(model.validate().err(), Some("member point id is out-of-bounds"));

        let mut model = two_node_model();
        model.nodes[1].coords = vec![0.0, 0.0];
        assert_eq!(model.validate().err(), Some("two-node member has zero length"));

        let mut model = two_node_model();
        model.members[0].id = 3;
        assert_eq!(model.validate().err(), Some("member ids must be sequential"));
    }

    #[test]
    fn distance_works() {
        let model = two_node_model();
        assert_eq!(model.distance(0, 1), Ok(5.0));
        assert_eq!(
            model.distance(0, 9).err(),
            Some("cannot compute distance because node id is out-of-bounds")
        );
    }

    #[test]
    fn derive_works() {
        let model = two_node_model();
        let json = serde_json::to_string(&model).unwrap();
        let read: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(read.nodes.len(), 2);
        assert_eq!(read.members[0].points, &[0, 1]);
    }
}
