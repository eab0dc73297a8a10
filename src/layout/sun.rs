//! Sunrise/sunset times and night shading for a window.
//!
//! Rise, set and solar position come from the NREL Solar Position Algorithm
//! (`spa` crate). Rise/set are taken per UTC calendar date; where neighbouring
//! dates disagree (the edges of a polar day or polar night) the missing
//! horizon crossing is found by searching the Sun's elevation directly.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use spa::{StdFloatOps, SunriseAndSet};

use super::{NightInterval, SunEvent, SunEventKind, SunIntervals, TimeWindow};
use crate::ir::Location;

/// Apparent elevation of the Sun's centre, in degrees, when its upper limb
/// touches the horizon.
pub const HORIZON_ELEVATION: f64 = -0.26667;

const SEARCH_STEP_SECS: i64 = 300;
/// A crossing missing from the per-date tables lies within this many days of
/// the mark that exposed it.
const SEARCH_SPAN_DAYS: i64 = 2;

/// Rise and set on one UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarDay {
    /// Both instants fall on the date. East or west of the date line the
    /// sunset can precede the sunrise.
    Daylight {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
    PolarDay,
    PolarNight,
}

impl SolarDay {
    fn is_night_at(&self, instant: DateTime<Utc>) -> bool {
        match *self {
            SolarDay::Daylight { sunrise, sunset } if sunrise <= sunset => {
                instant < sunrise || instant > sunset
            }
            SolarDay::Daylight { sunrise, sunset } => instant > sunset && instant < sunrise,
            SolarDay::PolarDay => false,
            SolarDay::PolarNight => true,
        }
    }
}

fn date_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `None` only when the location is outside the valid coordinate range.
pub fn solar_day(date: NaiveDate, location: Location) -> Option<SolarDay> {
    let result =
        spa::sunrise_and_set::<StdFloatOps>(date_start(date), location.latitude, location.longitude);
    match result {
        Ok(SunriseAndSet::Daylight(sunrise, sunset)) => Some(SolarDay::Daylight { sunrise, sunset }),
        Ok(SunriseAndSet::PolarDay) => Some(SolarDay::PolarDay),
        Ok(SunriseAndSet::PolarNight) => Some(SolarDay::PolarNight),
        Err(err) => {
            log::debug!("no solar day for {date} at {location:?}: {err:?}");
            None
        }
    }
}

/// Apparent elevation of the Sun's centre in degrees, refraction included.
pub fn sun_elevation(instant: DateTime<Utc>, location: Location) -> Option<f64> {
    spa::solar_position::<StdFloatOps>(instant, location.latitude, location.longitude)
        .ok()
        .map(|position| 90.0 - position.zenith_angle)
}

/// Whether `instant` lies outside the daylight of its UTC date.
pub fn is_night(instant: DateTime<Utc>, location: Location) -> bool {
    match solar_day(instant.date_naive(), location) {
        Some(day) => day.is_night_at(instant),
        None => false,
    }
}

/// First instant in `[from, to]` where the Sun crosses the horizon in the
/// given direction, to the nearest second.
fn find_crossing(
    location: Location,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    rising: bool,
) -> Option<DateTime<Utc>> {
    let above = |instant| sun_elevation(instant, location).map(|e| e > HORIZON_ELEVATION);
    let mut lo = from;
    let mut lo_above = above(lo)?;
    while lo < to {
        let hi = (lo + TimeDelta::seconds(SEARCH_STEP_SECS)).min(to);
        let hi_above = above(hi)?;
        if hi_above == rising && lo_above != rising {
            let (mut a, mut b) = (lo, hi);
            while b - a > TimeDelta::seconds(1) {
                let mid = a + (b - a) / 2;
                if above(mid)? == rising {
                    b = mid;
                } else {
                    a = mid;
                }
            }
            return Some(b);
        }
        lo = hi;
        lo_above = hi_above;
    }
    None
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Rise(DateTime<Utc>),
    Set(DateTime<Utc>),
    /// A whole date with no crossing, starting at the given instant.
    Polar {
        at: DateTime<Utc>,
        until: DateTime<Utc>,
        night: bool,
    },
}

impl Mark {
    fn at(&self) -> DateTime<Utc> {
        match *self {
            Mark::Rise(at) | Mark::Set(at) | Mark::Polar { at, .. } => at,
        }
    }
}

fn day_marks(location: Location, first: NaiveDate, last: NaiveDate) -> Vec<Mark> {
    let mut marks = Vec::new();
    let mut skipped = 0usize;
    for date in first.iter_days().take_while(|date| *date <= last) {
        match solar_day(date, location) {
            Some(SolarDay::Daylight { sunrise, sunset }) => {
                marks.push(Mark::Rise(sunrise));
                marks.push(Mark::Set(sunset));
            }
            Some(SolarDay::PolarDay) => marks.push(Mark::Polar {
                at: date_start(date),
                until: date_start(date + TimeDelta::days(1)),
                night: false,
            }),
            Some(SolarDay::PolarNight) => marks.push(Mark::Polar {
                at: date_start(date),
                until: date_start(date + TimeDelta::days(1)),
                night: true,
            }),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("no sunrise/sunset on {skipped} day(s) near {location:?}");
    }
    marks.sort_by_key(Mark::at);
    marks
}

struct NightWalk {
    location: Location,
    end: DateTime<Utc>,
    night: bool,
    /// Instant of the last day/night change, or the window start.
    since: DateTime<Utc>,
    sun_events: Vec<SunEvent>,
    night_intervals: Vec<NightInterval>,
}

impl NightWalk {
    fn sunrise(&mut self, at: DateTime<Utc>) {
        self.sun_events.push(SunEvent {
            instant: at,
            kind: SunEventKind::Sunrise,
        });
        if self.night {
            self.night_intervals.push(NightInterval {
                start: self.since,
                end: at,
            });
        }
        self.night = false;
        self.since = at;
    }

    fn sunset(&mut self, at: DateTime<Utc>) {
        self.sun_events.push(SunEvent {
            instant: at,
            kind: SunEventKind::Sunset,
        });
        self.night = true;
        self.since = at;
    }

    /// The Sun crossed the horizon somewhere in `[since, before]` without a
    /// reported event. Returns false when no crossing is found.
    fn recover_crossing(&mut self, before: DateTime<Utc>, rising: bool) -> bool {
        let from = self.since.max(before - TimeDelta::days(SEARCH_SPAN_DAYS));
        match find_crossing(self.location, from, before, rising) {
            Some(at) if rising => self.sunrise(at),
            Some(at) => self.sunset(at),
            None => return false,
        }
        true
    }

    fn step(&mut self, mark: Mark) {
        match mark {
            Mark::Rise(at) => {
                if !self.night && !self.recover_crossing(at, false) {
                    log::debug!("dropping sunrise at {at} with no preceding sunset");
                    return;
                }
                self.sunrise(at);
            }
            Mark::Set(at) => {
                if self.night && !self.recover_crossing(at, true) {
                    log::debug!("dropping sunset at {at} with no following sunrise");
                    return;
                }
                self.sunset(at);
            }
            Mark::Polar { at, until, night } if night != self.night => {
                let to = until.min(self.end);
                if !self.recover_crossing(to, !night) {
                    // Model disagreement inside a single step: switch at the date boundary.
                    if night {
                        self.sunset(at);
                    } else {
                        self.sunrise(at);
                    }
                }
            }
            Mark::Polar { .. } => {}
        }
    }
}

/// Sunrise/sunset events strictly inside the window plus the night spans they
/// bound. Polar dates contribute no events of their own.
pub fn compute_sun_intervals(location: Location, window: &TimeWindow) -> SunIntervals {
    let (start, end) = (window.start(), window.end());
    let first_day = start.date_naive() - TimeDelta::days(1);
    let last_day = end.date_naive() + TimeDelta::days(1);

    let night = is_night(start, location);
    let mut walk = NightWalk {
        location,
        end,
        night,
        since: start,
        sun_events: Vec::new(),
        night_intervals: Vec::new(),
    };
    for mark in day_marks(location, first_day, last_day) {
        let at = mark.at();
        if at <= start && !matches!(mark, Mark::Polar { until, .. } if until > start) {
            continue;
        }
        if at >= end {
            break;
        }
        let mark = match mark {
            Mark::Polar { until, night, .. } => Mark::Polar {
                at: at.max(start),
                until,
                night,
            },
            other => other,
        };
        walk.step(mark);
    }
    if walk.night {
        walk.night_intervals.push(NightInterval {
            start: walk.since,
            end,
        });
    }
    walk.sun_events.retain(|event| event.instant > start && event.instant < end);

    SunIntervals {
        sun_events: walk.sun_events,
        night_intervals: walk.night_intervals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn thessaloniki() -> Location {
        Location::new(40.0, 23.7)
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    /// Alternating events, each night bounded by a sunset or the window start
    /// on the left and a sunrise or the window end on the right.
    fn assert_coherent(result: &SunIntervals, window: &TimeWindow) {
        for pair in result.sun_events.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind, "{:?}", result.sun_events);
            assert!(pair[0].instant < pair[1].instant);
        }
        let has_event = |instant, kind| {
            result
                .sun_events
                .iter()
                .any(|e| e.instant == instant && e.kind == kind)
        };
        for night in &result.night_intervals {
            assert!(night.start < night.end);
            assert!(night.start == window.start() || has_event(night.start, SunEventKind::Sunset));
            assert!(night.end == window.end() || has_event(night.end, SunEventKind::Sunrise));
        }
        for pair in result.night_intervals.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn solstice_times_are_plausible() {
        let Some(SolarDay::Daylight { sunrise, sunset }) = solar_day(date(2024, 6, 21), thessaloniki())
        else {
            panic!("expected daylight at 40N on the solstice");
        };
        assert!(sunrise > utc(2024, 6, 21, 2, 30) && sunrise < utc(2024, 6, 21, 3, 20));
        assert!(sunset > utc(2024, 6, 21, 17, 30) && sunset < utc(2024, 6, 21, 18, 20));
        let daylight = sunset - sunrise;
        assert!(daylight > TimeDelta::minutes(14 * 60 + 40));
        assert!(daylight < TimeDelta::minutes(15 * 60 + 10));
    }

    #[test]
    fn elevation_agrees_with_day_and_night() {
        let noon = sun_elevation(utc(2024, 6, 21, 10, 30), thessaloniki()).unwrap();
        let midnight = sun_elevation(utc(2024, 6, 21, 22, 30), thessaloniki()).unwrap();
        assert!(noon > 70.0 && noon < 75.0);
        assert!(midnight < HORIZON_ELEVATION);
    }

    #[test]
    fn solstice_window_has_one_rise_one_set_two_nights() {
        let window = TimeWindow::new(utc(2024, 6, 21, 0, 0), utc(2024, 6, 21, 23, 59)).unwrap();
        let result = compute_sun_intervals(thessaloniki(), &window);

        let kinds: Vec<SunEventKind> = result.sun_events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![SunEventKind::Sunrise, SunEventKind::Sunset]);

        let sunrise = result.sun_events[0].instant;
        let sunset = result.sun_events[1].instant;
        assert_eq!(
            result.night_intervals,
            vec![
                NightInterval {
                    start: window.start(),
                    end: sunrise
                },
                NightInterval {
                    start: sunset,
                    end: window.end()
                },
            ]
        );
    }

    #[test]
    fn window_inside_one_night_is_fully_covered() {
        let window = TimeWindow::new(utc(2024, 1, 15, 20, 0), utc(2024, 1, 16, 2, 0)).unwrap();
        let result = compute_sun_intervals(thessaloniki(), &window);
        assert!(result.sun_events.is_empty());
        assert_eq!(
            result.night_intervals,
            vec![NightInterval {
                start: window.start(),
                end: window.end()
            }]
        );
    }

    #[test]
    fn daytime_window_has_no_night() {
        let window = TimeWindow::new(utc(2024, 6, 21, 8, 0), utc(2024, 6, 21, 14, 0)).unwrap();
        let result = compute_sun_intervals(thessaloniki(), &window);
        assert!(result.sun_events.is_empty());
        assert!(result.night_intervals.is_empty());
    }

    #[test]
    fn multi_day_window_alternates_events() {
        let window = TimeWindow::new(utc(2024, 3, 10, 12, 0), utc(2024, 3, 13, 12, 0)).unwrap();
        let result = compute_sun_intervals(thessaloniki(), &window);
        assert_eq!(result.sun_events.len(), 6);
        assert_coherent(&result, &window);
        // Starts at noon, so every night begins at a sunset.
        assert_eq!(result.night_intervals.len(), 3);
    }

    #[test]
    fn polar_night_covers_whole_window() {
        let svalbard = Location::new(80.0, 15.0);
        let window = TimeWindow::new(utc(2024, 12, 20, 0, 0), utc(2024, 12, 23, 0, 0)).unwrap();
        let result = compute_sun_intervals(svalbard, &window);
        assert!(result.sun_events.is_empty());
        assert_eq!(
            result.night_intervals,
            vec![NightInterval {
                start: window.start(),
                end: window.end()
            }]
        );
    }

    #[test]
    fn polar_day_has_no_night() {
        let svalbard = Location::new(80.0, 15.0);
        let window = TimeWindow::new(utc(2024, 6, 20, 0, 0), utc(2024, 6, 23, 0, 0)).unwrap();
        let result = compute_sun_intervals(svalbard, &window);
        assert!(result.sun_events.is_empty());
        assert!(result.night_intervals.is_empty());
        assert!(!is_night(window.start(), svalbard));
    }

    #[test]
    fn arctic_circle_nights_shrink_into_polar_day() {
        // At 66.6N the last short nights before midsummer fall in early June.
        for longitude in [-179.9, -90.0, 0.0, 90.0, 179.9] {
            let site = Location::new(66.6, longitude);
            let window = TimeWindow::new(utc(2024, 6, 1, 0, 0), utc(2024, 6, 12, 0, 0)).unwrap();
            let result = compute_sun_intervals(site, &window);
            assert_coherent(&result, &window);
            for night in &result.night_intervals {
                assert!(night.end - night.start < TimeDelta::hours(3), "lon {longitude}: {night:?}");
            }
            // Midnight sun by the end of the window.
            assert!(
                result
                    .night_intervals
                    .last()
                    .is_none_or(|night| night.end < window.end()),
                "lon {longitude}: night runs into the polar day"
            );
        }
    }

    #[test]
    fn arctic_circle_nights_return_after_polar_day() {
        for longitude in [-179.9, -90.0, 0.0, 90.0, 179.9] {
            let site = Location::new(66.6, longitude);
            let window = TimeWindow::new(utc(2024, 6, 20, 0, 0), utc(2024, 7, 20, 0, 0)).unwrap();
            let result = compute_sun_intervals(site, &window);
            assert_coherent(&result, &window);
            assert!(!is_night(window.start(), site));
            assert!(!result.night_intervals.is_empty(), "lon {longitude}: no night by late July");
            for night in &result.night_intervals {
                assert!(night.end - night.start < TimeDelta::hours(4), "lon {longitude}: {night:?}");
                let mid = night.start + (night.end - night.start) / 2;
                if night.end - night.start > TimeDelta::minutes(30) {
                    assert!(sun_elevation(mid, site).unwrap() < HORIZON_ELEVATION);
                }
            }
        }
    }

    #[test]
    fn out_of_range_location_yields_no_shading() {
        let nowhere = Location::new(95.0, 0.0);
        let window = TimeWindow::new(utc(2024, 1, 1, 0, 0), utc(2024, 1, 2, 0, 0)).unwrap();
        let result = compute_sun_intervals(nowhere, &window);
        assert!(result.sun_events.is_empty());
        assert!(result.night_intervals.is_empty());
    }

    #[test]
    fn far_east_longitude_classifies_night_correctly() {
        // Sydney: 2024-06-21 10:00 UTC is 20:00 local, well after sunset.
        let sydney = Location::new(-33.87, 151.21);
        assert!(is_night(utc(2024, 6, 21, 10, 0), sydney));
        assert!(!is_night(utc(2024, 6, 21, 2, 0), sydney));
        let window = TimeWindow::new(utc(2024, 6, 20, 0, 0), utc(2024, 6, 23, 0, 0)).unwrap();
        assert_coherent(&compute_sun_intervals(sydney, &window), &window);
    }
}
