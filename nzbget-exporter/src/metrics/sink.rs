use crate::Error;
use crate::collector::FetchUnit;

use super::MetricDesc;

/// Receiver of one scrape's output.
pub trait MetricSink {
    /// A value for `desc`, with label values in schema order.
    fn sample(&mut self, desc: &MetricDesc, labels: &[String], value: f64);

    /// `unit` could not be fetched. `desc` is the collect-success family.
    fn fault(&mut self, desc: &MetricDesc, unit: FetchUnit, error: &Error);
}

impl<S: MetricSink + ?Sized> MetricSink for &mut S {
    fn sample(&mut self, desc: &MetricDesc, labels: &[String], value: f64) {
        (**self).sample(desc, labels, value);
    }

    fn fault(&mut self, desc: &MetricDesc, unit: FetchUnit, error: &Error) {
        (**self).fault(desc, unit, error);
    }
}
