//! Pre-flight checks on a waveform and its arrival picks.
//!
//! Both checks are pure: they never touch the data, they only decide whether a
//! record may enter the next stage.
//!
//! # Unset sampling rate
//!
//! The ingestion format leaves the sampling rate at exactly 1 Hz when the header
//! does not set it, so a rate of exactly `1.0` is rejected as
//! [`ValidationError::UnsetSamplingParameters`]. A genuine 1 Hz record is
//! therefore rejected too; this is a known limitation of the sentinel.

use crate::arrivals::{ArrivalPicks, ArrivalTimes};
use crate::error::ValidationError;
use crate::waveform::Waveform;
use std::collections::HashSet;

/// Sampling rate that marks "not set" in the ingestion format.
pub const UNSET_SAMPLING_RATE: f64 = 1.0;

/// Check that a waveform is usable.
///
/// Checks, in order: at least one channel; per channel, non-empty samples and
/// a set sampling rate; then that every channel shares the first channel's
/// station, start time, sampling rate and sample count, with unique components.
pub fn validate_waveform(waveform: &Waveform) -> Result<(), ValidationError> {
    let Some(first) = waveform.first() else {
        return Err(ValidationError::EmptyWaveform);
    };

    for channel in waveform {
        if channel.samples.is_empty() {
            return Err(ValidationError::EmptyChannel(channel.component.clone()));
        }
        if channel.sampling_rate == UNSET_SAMPLING_RATE {
            return Err(ValidationError::UnsetSamplingParameters(
                channel.component.clone(),
            ));
        }
        if !(channel.sampling_rate.is_finite() && channel.sampling_rate > 0.0) {
            return Err(ValidationError::InvalidSamplingRate {
                component: channel.component.clone(),
                rate: channel.sampling_rate,
            });
        }
    }

    let mut seen = HashSet::new();
    for channel in waveform {
        let mismatch = if channel.station != first.station {
            Some("station")
        } else if channel.start_time != first.start_time {
            Some("start time")
        } else if channel.sampling_rate != first.sampling_rate {
            Some("sampling rate")
        } else if channel.npts() != first.npts() {
            Some("sample count")
        } else {
            None
        };
        if let Some(field) = mismatch {
            return Err(ValidationError::InconsistentChannels {
                component: channel.component.clone(),
                field,
            });
        }
        if !seen.insert(channel.component.as_str()) {
            return Err(ValidationError::DuplicateComponent(
                channel.component.clone(),
            ));
        }
    }

    Ok(())
}

/// Check arrival picks against the waveform and the window length.
///
/// Both picks must be present and finite.
/// The noise window spans `[P - window_length - 1, P + 1]` and the signal
/// window `[S - 1, S + window_length + 1]`, so P needs at least
/// `window_length + 1` seconds of lead time and S at least as much trailing
/// time. The duration is taken from the first channel.
pub fn validate_arrivals(
    waveform: &Waveform,
    picks: &ArrivalPicks,
    window_length: f64,
) -> Result<ArrivalTimes, ValidationError> {
    let p = picks.p.ok_or(ValidationError::MissingPArrival)?;
    let s = picks.s.ok_or(ValidationError::MissingSArrival)?;
    for (phase, value) in [("P", p), ("S", s)] {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteArrival { phase, value });
        }
    }

    if p >= s {
        return Err(ValidationError::InvalidArrivalOrder { p, s });
    }

    let margin = window_length + 1.0;
    if p < margin {
        return Err(ValidationError::PArrivalTooEarly {
            p,
            window_length,
            minimum: margin,
        });
    }

    let duration = waveform.duration();
    if s > duration - margin {
        return Err(ValidationError::SArrivalTooLate {
            s,
            window_length,
            maximum: duration - margin,
        });
    }

    Ok(ArrivalTimes { p, s })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::Channel;
    use chrono::{TimeZone, Utc};

    fn channel(component: &str, rate: f64, npts: usize) -> Channel {
        let start = Utc.with_ymd_and_hms(2014, 1, 26, 13, 55, 29).unwrap();
        Channel::new("VSK1", component, rate, start, vec![0.0; npts])
    }

    fn three_component(rate: f64, npts: usize) -> Waveform {
        Waveform::new(vec![
            channel("E", rate, npts),
            channel("N", rate, npts),
            channel("Z", rate, npts),
        ])
    }

    #[test]
    fn valid_waveform_passes() {
        assert_eq!(validate_waveform(&three_component(100.0, 1000)), Ok(()));
    }

    #[test]
    fn no_channels_fails() {
        assert_eq!(
            validate_waveform(&Waveform::default()),
            Err(ValidationError::EmptyWaveform)
        );
    }

    #[test]
    fn emptied_channel_fails() {
        let mut w = three_component(100.0, 1000);
        w.channels[1].samples.clear();
        assert_eq!(
            validate_waveform(&w),
            Err(ValidationError::EmptyChannel("N".into()))
        );
    }

    #[test]
    fn unit_rate_is_unset_sentinel() {
        assert_eq!(
            validate_waveform(&three_component(1.0, 100)),
            Err(ValidationError::UnsetSamplingParameters("E".into()))
        );
    }

    #[test]
    fn non_positive_rate_fails() {
        assert!(matches!(
            validate_waveform(&three_component(0.0, 100)),
            Err(ValidationError::InvalidSamplingRate { .. })
        ));
    }

    #[test]
    fn mismatched_npts_fails() {
        let mut w = three_component(100.0, 1000);
        w.channels[2].samples.push(0.0);
        assert_eq!(
            validate_waveform(&w),
            Err(ValidationError::InconsistentChannels {
                component: "Z".into(),
                field: "sample count",
            })
        );
    }

    #[test]
    fn duplicate_component_fails() {
        let w = Waveform::new(vec![channel("E", 100.0, 10), channel("E", 100.0, 10)]);
        assert_eq!(
            validate_waveform(&w),
            Err(ValidationError::DuplicateComponent("E".into()))
        );
    }

    #[test]
    fn arrivals_accepted() {
        // 50 s record
        let w = three_component(100.0, 5001);
        let times = validate_arrivals(&w, &ArrivalPicks::new(20.0, 40.0), 5.0).unwrap();
        assert_eq!(times, ArrivalTimes { p: 20.0, s: 40.0 });
    }

    #[test]
    fn missing_picks() {
        let w = three_component(100.0, 5001);
        let no_p = ArrivalPicks { p: None, s: Some(30.0) };
        let no_s = ArrivalPicks { p: Some(10.0), s: None };
        assert_eq!(
            validate_arrivals(&w, &no_p, 5.0),
            Err(ValidationError::MissingPArrival)
        );
        assert_eq!(
            validate_arrivals(&w, &no_s, 5.0),
            Err(ValidationError::MissingSArrival)
        );
    }

    #[test]
    fn non_finite_picks() {
        let w = three_component(100.0, 5001);
        let nan_p = ArrivalPicks::new(f64::NAN, 20.0);
        assert!(matches!(
            validate_arrivals(&w, &nan_p, 5.0),
            Err(ValidationError::NonFiniteArrival { phase: "P", value }) if value.is_nan()
        ));
        let nan_s = ArrivalPicks::new(10.0, f64::NAN);
        assert!(matches!(
            validate_arrivals(&w, &nan_s, 5.0),
            Err(ValidationError::NonFiniteArrival { phase: "S", .. })
        ));
        assert_eq!(
            validate_arrivals(&w, &ArrivalPicks::new(10.0, f64::INFINITY), 5.0),
            Err(ValidationError::NonFiniteArrival {
                phase: "S",
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn reversed_arrivals() {
        let w = three_component(100.0, 5001);
        assert_eq!(
            validate_arrivals(&w, &ArrivalPicks::new(25.0, 20.0), 5.0),
            Err(ValidationError::InvalidArrivalOrder { p: 25.0, s: 20.0 })
        );
        assert!(matches!(
            validate_arrivals(&w, &ArrivalPicks::new(20.0, 20.0), 5.0),
            Err(ValidationError::InvalidArrivalOrder { .. })
        ));
    }

    #[test]
    fn p_too_early() {
        let w = three_component(100.0, 5001);
        assert!(matches!(
            validate_arrivals(&w, &ArrivalPicks::new(5.5, 20.0), 5.0),
            Err(ValidationError::PArrivalTooEarly { minimum, .. }) if minimum == 6.0
        ));
        // exactly window_length + 1 is accepted
        assert!(validate_arrivals(&w, &ArrivalPicks::new(6.0, 20.0), 5.0).is_ok());
    }

    #[test]
    fn s_too_late() {
        // 45 s record: S must be <= 39
        let w = three_component(100.0, 4501);
        assert!(matches!(
            validate_arrivals(&w, &ArrivalPicks::new(20.0, 40.0), 5.0),
            Err(ValidationError::SArrivalTooLate { .. })
        ));
        assert!(validate_arrivals(&w, &ArrivalPicks::new(20.0, 39.0), 5.0).is_ok());
    }
}
