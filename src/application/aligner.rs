// Pairs each series descriptor with its observation stream
use crate::domain::coverage::SeriesData;
use crate::domain::error::QueryError;
use crate::domain::series::{ObservationStream, SeriesDescriptor};

/// Produce one `SeriesData` per series. Both inputs must be in the same order.
pub fn align(
    descriptors: Vec<SeriesDescriptor>,
    streams: Vec<ObservationStream>,
) -> Result<Vec<SeriesData>, QueryError> {
    if descriptors.len() != streams.len() {
        let position = descriptors.len().min(streams.len());
        return Err(QueryError::Misalignment {
            position,
            expected: descriptors.get(position).map(|d| d.id),
            found: streams.get(position).map(|s| s.series_id),
        });
    }

    descriptors
        .into_iter()
        .zip(streams)
        .enumerate()
        .map(|(position, (descriptor, stream))| {
            if descriptor.id != stream.series_id {
                return Err(QueryError::Misalignment {
                    position,
                    expected: Some(descriptor.id),
                    found: Some(stream.series_id),
                });
            }

            let (times, values): (Vec<_>, Vec<_>) = stream
                .observations
                .into_iter()
                .map(|obs| (obs.time, obs.value))
                .unzip();

            if let Some(index) = times.windows(2).position(|w| w[0] > w[1]) {
                return Err(QueryError::UnorderedObservations {
                    series_id: stream.series_id,
                    index: index + 1,
                });
            }

            Ok(SeriesData {
                location: descriptor.location,
                parameter_id: descriptor.parameter_id,
                unit: descriptor.unit,
                times,
                values,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{descriptor, hour, stream};
    use crate::domain::series::Observation;

    #[test]
    fn test_align_copies_location_and_values() {
        let aligned = align(
            vec![
                descriptor(1, "06260", "tn", 52.0, 5.0),
                descriptor(2, "06260", "rh", 52.0, 5.0),
            ],
            vec![stream(1, &[1.0, 2.0]), stream(2, &[80.0, 81.0])],
        )
        .unwrap();

        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].parameter_id, "tn");
        assert_eq!(aligned[0].location.lat, 52.0);
        assert_eq!(aligned[0].times, vec![hour(0), hour(1)]);
        assert_eq!(aligned[1].values, vec![Some(80.0), Some(81.0)]);
    }

    #[test]
    fn test_count_mismatch_is_an_error() {
        let err = align(vec![descriptor(1, "06260", "tn", 52.0, 5.0)], vec![]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Misalignment {
                position: 0,
                expected: Some(1),
                found: None
            }
        ));
    }

    #[test]
    fn test_id_mismatch_is_an_error() {
        let err = align(
            vec![descriptor(1, "06260", "tn", 52.0, 5.0)],
            vec![stream(9, &[1.0])],
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::Misalignment { found: Some(9), .. }));
    }

    #[test]
    fn test_out_of_order_times_rejected() {
        let backwards = ObservationStream::new(
            4,
            vec![
                Observation::new(hour(3), Some(1.0)),
                Observation::new(hour(1), Some(2.0)),
            ],
        );

        let err = align(vec![descriptor(4, "06260", "tn", 52.0, 5.0)], vec![backwards]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::UnorderedObservations {
                series_id: 4,
                index: 1
            }
        ));
    }

    #[test]
    fn test_repeated_timestamps_allowed() {
        let flat = ObservationStream::new(
            4,
            vec![
                Observation::new(hour(1), Some(1.0)),
                Observation::new(hour(1), Some(2.0)),
            ],
        );

        let aligned = align(vec![descriptor(4, "06260", "tn", 52.0, 5.0)], vec![flat]).unwrap();
        assert_eq!(aligned[0].times, vec![hour(1), hour(1)]);
    }
}
