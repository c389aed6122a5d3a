//! Merge of ascending sample streams into table rows.
//!
//! Every stream is drained by its own scoped producer thread through a
//! single-slot channel; the calling thread picks the smallest head and
//! writes one row per distinct `x`. Returning early drops the receivers,
//! which ends every producer at its next send.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use ct_core::{CtError, CtResult, Point};
use tracing::warn;

use crate::data::DataContent;
use crate::error::{DataError, DataResult};
use crate::format::Format;

struct Stream {
    name: String,
    rx: Receiver<CtResult<Point>>,
    head: Option<Point>,
}

impl Stream {
    fn advance(&mut self) -> DataResult<()> {
        self.head = match self.rx.recv() {
            Ok(Ok(p)) if p.x.is_nan() => {
                return Err(DataError::Read {
                    name: self.name.clone(),
                    source: CtError::NonFinite {
                        what: "sample time",
                        value: p.x,
                    },
                });
            }
            Ok(Ok(p)) => Some(p),
            Ok(Err(source)) => {
                warn!(series = %self.name, error = %source, "sample producer failed");
                return Err(DataError::Read {
                    name: self.name.clone(),
                    source,
                });
            }
            // producer finished
            Err(_) => None,
        };
        Ok(())
    }
}

pub(crate) fn merge_rows<F: Format>(
    content: Vec<DataContent<'_>>,
    format: &F,
    out: &mut String,
) -> DataResult<()> {
    thread::scope(|scope| {
        let mut streams = Vec::with_capacity(content.len());
        for DataContent { name, points, .. } in content {
            let (tx, rx) = mpsc::sync_channel(1);
            scope.spawn(move || {
                for item in points {
                    let failed = item.is_err();
                    if tx.send(item).is_err() || failed {
                        break;
                    }
                }
            });
            streams.push(Stream {
                name,
                rx,
                head: None,
            });
        }

        for s in &mut streams {
            s.advance()?;
        }
        write_rows(&mut streams, format, out)
    })
}

fn write_rows<F: Format>(streams: &mut [Stream], format: &F, out: &mut String) -> DataResult<()> {
    loop {
        let next = streams
            .iter()
            .filter_map(|s| s.head.map(|p| p.x))
            .reduce(f64::min);
        let Some(t) = next else {
            return Ok(());
        };

        format.write_time(out, t)?;
        for s in streams.iter_mut() {
            match s.head {
                Some(p) if p.x == t => {
                    format.write_value(out, p.y);
                    s.advance()?;
                    if let Some(n) = s.head {
                        if n.x < t {
                            return Err(DataError::NotAscending {
                                name: s.name.clone(),
                                new: n.x,
                                old: t,
                            });
                        }
                    }
                }
                _ => format.skip_value(out),
            }
        }
    }
}
