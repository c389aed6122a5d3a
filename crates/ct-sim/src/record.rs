//! Samples recorded during a simulation run.

use ct_core::{points_from_vec, CtError, Point, Points};
use ct_data::{Data, DataContent};

use crate::error::{SimError, SimResult};

/// Recorded signal values, one column per block output in block order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimRecord {
    names: Vec<String>,
    time: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl SimRecord {
    pub(crate) fn new(names: Vec<String>) -> Self {
        let values = vec![Vec::new(); names.len()];
        Self {
            names,
            time: Vec::new(),
            values,
        }
    }

    pub(crate) fn push(&mut self, t: f64, values: &[f64]) {
        self.time.push(t);
        for (column, &v) in self.values.iter_mut().zip(values) {
            column.push(v);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of recorded samples per signal.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn values(&self, name: &str) -> SimResult<&[f64]> {
        self.column(name).map(|i| self.values[i].as_slice())
    }

    /// Last recorded value of `name`.
    pub fn last(&self, name: &str) -> SimResult<Option<f64>> {
        Ok(self.values(name)?.last().copied())
    }

    /// Samples of `name` as a point stream over time.
    pub fn points(&self, name: &str) -> SimResult<Points<'_>> {
        let values = self.values(name)?;
        let points: Points<'_> = Box::new(
            self.time
                .iter()
                .zip(values)
                .map(|(&t, &y)| Ok::<_, CtError>(Point::new(t, y))),
        );
        Ok(points)
    }

    /// Bundle every signal for DAT/CSV export.
    pub fn into_data(self, time_unit: &str) -> Data<'static> {
        let mut data = Data::new(time_unit);
        for (name, column) in self.names.into_iter().zip(self.values) {
            let pts = self
                .time
                .iter()
                .zip(column)
                .map(|(&t, y)| Point::new(t, y))
                .collect();
            data.add(DataContent::new(name, "", points_from_vec(pts)));
        }
        data
    }

    fn column(&self, name: &str) -> SimResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SimError::UnknownSignal {
                name: name.to_string(),
            })
    }
}
