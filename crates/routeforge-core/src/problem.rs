//! Immutable problem model: cost matrix, dimensions, vehicles, depot.

use crate::error::{Result, SolverError};

/// A named resource constraint tracked cumulatively along every route.
///
/// Each dimension maps every node to a non-negative demand and every
/// vehicle to a non-negative capacity. The cumulative demand along a
/// route starts at zero at the depot and must never exceed the vehicle
/// capacity at any prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: String,
    demands: Vec<i64>,
    capacities: Vec<i64>,
}

impl Dimension {
    /// Creates a new dimension from per-node demands and per-vehicle capacities.
    ///
    /// Validation against the problem's node and vehicle counts happens in
    /// [`Problem::with_dimension`].
    pub fn new(name: impl Into<String>, demands: Vec<i64>, capacities: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            demands,
            capacities,
        }
    }

    /// Returns the dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the demand of the given node.
    pub fn demand(&self, node: usize) -> i64 {
        self.demands[node]
    }

    /// Returns the capacity of the given vehicle.
    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.capacities[vehicle]
    }

    /// Sum of all node demands.
    pub fn total_demand(&self) -> i64 {
        self.demands.iter().sum()
    }

    /// Sum of all vehicle capacities.
    pub fn total_capacity(&self) -> i64 {
        self.capacities.iter().sum()
    }
}

/// An immutable CVRP instance.
///
/// Owns a dense row-major cost matrix, the vehicle count, the depot index
/// and the capacity dimensions. All lookups are O(1). The model never
/// mutates after construction and is safe to share read-only across
/// concurrent solves.
///
/// # Example
///
/// ```
/// use routeforge_core::{Dimension, Problem};
///
/// let problem = Problem::new(
///     vec![vec![0, 2, 4], vec![2, 0, 3], vec![4, 3, 0]],
///     2,
///     0,
/// )
/// .unwrap()
/// .with_dimension(Dimension::new("weight", vec![0, 1, 2], vec![2, 1]))
/// .unwrap();
///
/// assert_eq!(problem.cost(1, 2), 3);
/// assert_eq!(problem.dimensions()[0].demand(2), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    costs: Vec<i64>,
    num_nodes: usize,
    num_vehicles: usize,
    depot: usize,
    dimensions: Vec<Dimension>,
}

impl Problem {
    /// Creates a problem from a cost matrix, a vehicle count and a depot index.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidModel`] if the matrix is not square,
    /// contains a negative entry or a non-zero diagonal, if the depot index
    /// is out of range, or if there are no vehicles.
    pub fn new(costs: Vec<Vec<i64>>, num_vehicles: usize, depot: usize) -> Result<Self> {
        let num_nodes = costs.len();
        if num_nodes == 0 {
            return Err(SolverError::InvalidModel("cost matrix is empty".into()));
        }
        if num_vehicles == 0 {
            return Err(SolverError::InvalidModel(
                "vehicle count must be at least 1".into(),
            ));
        }
        if depot >= num_nodes {
            return Err(SolverError::InvalidModel(format!(
                "depot index {depot} out of range for {num_nodes} nodes"
            )));
        }

        let mut flat = Vec::with_capacity(num_nodes * num_nodes);
        for (i, row) in costs.iter().enumerate() {
            if row.len() != num_nodes {
                return Err(SolverError::InvalidModel(format!(
                    "cost matrix row {i} has length {}, expected {num_nodes}",
                    row.len()
                )));
            }
            for (j, &c) in row.iter().enumerate() {
                if c < 0 {
                    return Err(SolverError::InvalidModel(format!(
                        "negative cost {c} at ({i}, {j})"
                    )));
                }
                if i == j && c != 0 {
                    return Err(SolverError::InvalidModel(format!(
                        "non-zero diagonal cost {c} at node {i}"
                    )));
                }
                flat.push(c);
            }
        }

        Ok(Self {
            costs: flat,
            num_nodes,
            num_vehicles,
            depot,
            dimensions: Vec::new(),
        })
    }

    /// Adds a capacity dimension to the problem.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidModel`] if the demand vector length
    /// does not match the node count, the capacity vector length does not
    /// match the vehicle count, or any entry is negative.
    pub fn with_dimension(mut self, dimension: Dimension) -> Result<Self> {
        if dimension.demands.len() != self.num_nodes {
            return Err(SolverError::InvalidModel(format!(
                "dimension '{}' has {} demands, expected {}",
                dimension.name,
                dimension.demands.len(),
                self.num_nodes
            )));
        }
        if dimension.capacities.len() != self.num_vehicles {
            return Err(SolverError::InvalidModel(format!(
                "dimension '{}' has {} capacities, expected {}",
                dimension.name,
                dimension.capacities.len(),
                self.num_vehicles
            )));
        }
        if dimension.demands[self.depot] != 0 {
            return Err(SolverError::InvalidModel(format!(
                "dimension '{}' has non-zero depot demand {}",
                dimension.name, dimension.demands[self.depot]
            )));
        }
        if let Some(&d) = dimension.demands.iter().find(|&&d| d < 0) {
            return Err(SolverError::InvalidModel(format!(
                "dimension '{}' has negative demand {d}",
                dimension.name
            )));
        }
        if let Some(&c) = dimension.capacities.iter().find(|&&c| c < 0) {
            return Err(SolverError::InvalidModel(format!(
                "dimension '{}' has negative capacity {c}",
                dimension.name
            )));
        }
        self.dimensions.push(dimension);
        Ok(self)
    }

    /// Returns the number of nodes, depot included.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Returns the depot node index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Returns the travel cost from node `from` to node `to`.
    #[inline]
    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.costs[from * self.num_nodes + to]
    }

    /// Returns the capacity dimensions.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Iterates over all customer nodes (every node except the depot).
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes).filter(move |&n| n != self.depot)
    }
}
