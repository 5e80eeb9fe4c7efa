use rosu_map::{
    section::{
        difficulty::{Difficulty, DifficultyState, ParseDifficultyError},
        general::{GameMode, GeneralKey, ParseGameModeError},
        hit_objects::{HitObjectType, ParseHitObjectTypeError, PathControlPoint, PathType},
        timing_points::ControlPoint,
    },
    util::{KeyValue, ParseNumber, ParseNumberError, Pos, StrExt, MAX_PARSE_VALUE},
    DecodeBeatmap, DecodeState,
};

use crate::{
    model::{
        control_point::{difficulty_point_at, DifficultyPoint, TimingPoint},
        hit_object::{HitObject, HitObjectKind, Slider, Spinner},
    },
    util::float_ext::FloatExt,
};

use super::{Beatmap, DEFAULT_STACK_LENIENCY};

/// The state of a [`Beatmap`] for [`DecodeBeatmap`].
pub struct BeatmapState {
    version: i32,
    stack_leniency: f32,
    mode: GameMode,
    difficulty: DifficultyState,
    timing_points: Vec<TimingPoint>,
    difficulty_points: Vec<DifficultyPoint>,
    hit_objects: Vec<HitObject>,

    pending_control_points_time: f64,
    pending_timing_point: Option<TimingPoint>,
    pending_difficulty_point: Option<DifficultyPoint>,

    curve_points: Vec<PathControlPoint>,
    vertices: Vec<PathControlPoint>,
}

impl BeatmapState {
    fn add_pending_point<P: Pending>(&mut self, time: f64, point: P, timing_change: bool) {
        if time.not_eq(self.pending_control_points_time) {
            self.flush_pending_points();
        }

        if timing_change {
            point.push_front(self);
        } else {
            point.push_back(self);
        }

        self.pending_control_points_time = time;
    }

    fn flush_pending_points(&mut self) {
        if let Some(point) = self.pending_timing_point.take() {
            self.add_control_point(point);
        }

        if let Some(point) = self.pending_difficulty_point.take() {
            self.add_control_point(point);
        }
    }

    fn add_control_point<P: ControlPoint<Self>>(&mut self, point: P) {
        if !point.check_already_existing(self) {
            point.add(self);
        }
    }

    /// Split a slider's path into segments that each start with a path type
    /// and convert them into [`PathControlPoint`]s.
    fn convert_path_str(&mut self, point_str: &str, offset: Pos) -> Result<(), ParseBeatmapError> {
        let parts: Vec<&str> = point_str.split('|').collect();

        let mut segment_start = 0;

        for (i, part) in parts.iter().enumerate().skip(1) {
            let starts_segment = part
                .chars()
                .next()
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?
                .is_ascii_alphabetic();

            if starts_segment {
                // The first point of the next segment also ends this one
                let end_point = parts.get(i + 1).copied();
                let first = segment_start == 0;
                self.convert_points(&parts[segment_start..i], end_point, first, offset)?;

                segment_start = i;
            }
        }

        if parts.len() > segment_start {
            let first = segment_start == 0;
            self.convert_points(&parts[segment_start..], None, first, offset)?;
        }

        Ok(())
    }

    fn convert_points(
        &mut self,
        points: &[&str],
        end_point: Option<&str>,
        first: bool,
        offset: Pos,
    ) -> Result<(), ParseBeatmapError> {
        fn read_point(value: &str, start_pos: Pos) -> Result<PathControlPoint, ParseBeatmapError> {
            let mut v = value
                .split(':')
                .map(|s| s.parse_with_limits(f64::from(MAX_COORDINATE_VALUE)));

            let (x, y) = v
                .next()
                .zip(v.next())
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

            let pos = Pos::new(x? as i32 as f32, y? as i32 as f32);

            Ok(PathControlPoint::new(pos - start_pos))
        }

        fn is_linear(p0: Pos, p1: Pos, p2: Pos) -> bool {
            ((p1.y - p0.y) * (p2.x - p0.x)).eq((p1.x - p0.x) * (p2.y - p0.y))
        }

        let mut path_type = points
            .first()
            .copied()
            .map(PathType::new_from_str)
            .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

        let read_offset = usize::from(first);
        let readable_points = points.len() - 1;
        let end_point_len = usize::from(end_point.is_some());

        self.vertices.clear();
        self.vertices
            .reserve(read_offset + readable_points + end_point_len);

        if first {
            self.vertices.push(PathControlPoint::default());
        }

        for &point in points.iter().skip(1) {
            self.vertices.push(read_point(point, offset)?);
        }

        if let Some(end_point) = end_point {
            self.vertices.push(read_point(end_point, offset)?);
        }

        if path_type == PathType::PERFECT_CURVE {
            if let [a, b, c] = self.vertices.as_slice() {
                if is_linear(a.pos, b.pos, c.pos) {
                    path_type = PathType::LINEAR;
                }
            } else {
                path_type = PathType::BEZIER;
            }
        }

        let Some(head) = self.vertices.first_mut() else {
            return Err(ParseBeatmapError::InvalidHitObjectLine);
        };

        head.path_type = Some(path_type);

        // Duplicate consecutive positions split the segment
        let bound = self.vertices.len() - end_point_len;
        let mut segment_start = 0;

        for i in 1..bound {
            let is_split = self.vertices[i].pos == self.vertices[i - 1].pos
                && !(path_type == PathType::CATMULL && i > 1)
                && i != bound - 1;

            if is_split {
                self.vertices[i - 1].path_type = Some(path_type);
                self.curve_points.extend(&self.vertices[segment_start..i]);
                segment_start = i + 1;
            }
        }

        let segment_end = bound.max(1);

        if segment_end > segment_start {
            self.curve_points
                .extend(&self.vertices[segment_start..segment_end]);
        }

        Ok(())
    }
}

impl DecodeState for BeatmapState {
    fn create(version: i32) -> Self {
        Self {
            version,
            stack_leniency: DEFAULT_STACK_LENIENCY,
            mode: GameMode::Osu,
            difficulty: DifficultyState::create(version),
            timing_points: Vec::with_capacity(1),
            difficulty_points: Vec::new(),
            hit_objects: Vec::with_capacity(512),
            pending_control_points_time: 0.0,
            pending_timing_point: None,
            pending_difficulty_point: None,
            curve_points: Vec::with_capacity(8),
            vertices: Vec::with_capacity(8),
        }
    }
}

impl From<BeatmapState> for Beatmap {
    fn from(mut state: BeatmapState) -> Self {
        state.flush_pending_points();

        let Difficulty {
            hp_drain_rate,
            circle_size,
            overall_difficulty,
            approach_rate,
            slider_multiplier,
            slider_tick_rate,
        } = state.difficulty.into();

        // Stable so that simultaneous objects keep their file order
        state
            .hit_objects
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        Beatmap {
            version: state.version,
            stack_leniency: state.stack_leniency,
            mode: state.mode,
            ar: approach_rate,
            cs: circle_size,
            hp: hp_drain_rate,
            od: overall_difficulty,
            slider_multiplier,
            slider_tick_rate,
            timing_points: state.timing_points,
            difficulty_points: state.difficulty_points,
            hit_objects: state.hit_objects,
        }
    }
}

/// All the ways that parsing a [`Beatmap`] can fail.
#[derive(Debug, thiserror::Error)]
pub enum ParseBeatmapError {
    #[error("failed to parse hit object type")]
    HitObjectType(#[from] ParseHitObjectTypeError),
    #[error("repeat count must be between 0 and 9000")]
    InvalidRepeatCount,
    #[error("invalid timing point line")]
    InvalidTimingPointLine,
    #[error("invalid hit object line")]
    InvalidHitObjectLine,
    #[error("failed to parse mode")]
    Mode(#[from] ParseGameModeError),
    #[error("failed to parse number")]
    Number(#[from] ParseNumberError),
    #[error("beat length cannot be NaN in a timing control point")]
    TimingControlPointNaN,
    #[error("unknown hit object type")]
    UnknownHitObjectType,
}

impl From<ParseDifficultyError> for ParseBeatmapError {
    fn from(e: ParseDifficultyError) -> Self {
        match e {
            ParseDifficultyError::Number(e) => Self::Number(e),
        }
    }
}

const MAX_COORDINATE_VALUE: i32 = 131_072;
const MAX_REPEAT_COUNT: i32 = 9000;

impl DecodeBeatmap for Beatmap {
    type Error = ParseBeatmapError;
    type State = BeatmapState;

    fn parse_general(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let Ok(KeyValue { key, value }) = KeyValue::parse(line.trim_comment()) else {
            return Ok(());
        };

        match key {
            GeneralKey::StackLeniency => state.stack_leniency = value.parse_num()?,
            GeneralKey::Mode => state.mode = value.parse()?,
            _ => {}
        }

        Ok(())
    }

    fn parse_editor(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_metadata(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_difficulty(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        Difficulty::parse_difficulty(&mut state.difficulty, line).map_err(ParseBeatmapError::from)
    }

    fn parse_events(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_timing_points(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let mut split = line.trim_comment().split(',');

        let (time, beat_len) = split
            .next()
            .zip(split.next())
            .ok_or(ParseBeatmapError::InvalidTimingPointLine)?;

        let time = time.parse_num::<f64>()?;

        // Manual `str::parse_num::<f64>` so that NaN does not cause an error
        let beat_len = beat_len
            .trim()
            .parse::<f64>()
            .map_err(ParseNumberError::InvalidFloat)?;

        if beat_len < f64::from(-MAX_PARSE_VALUE) {
            return Err(ParseNumberError::NumberUnderflow.into());
        } else if beat_len > f64::from(MAX_PARSE_VALUE) {
            return Err(ParseNumberError::NumberOverflow.into());
        }

        let speed_multiplier = if beat_len < 0.0 {
            100.0 / -beat_len
        } else {
            1.0
        };

        let _ = split.next(); // timing signature
        let _ = split.next(); // sample set
        let _ = split.next(); // custom sample bank
        let _ = split.next(); // sample volume

        let timing_change = split
            .next()
            .map_or(true, |next| matches!(next.chars().next(), Some('1')));

        if timing_change {
            if beat_len.is_nan() {
                return Err(ParseBeatmapError::TimingControlPointNaN);
            }

            let timing = TimingPoint::new(time, beat_len);
            state.add_pending_point(time, timing, timing_change);
        }

        let difficulty = DifficultyPoint::new(time, beat_len, speed_multiplier);
        state.add_pending_point(time, difficulty, timing_change);

        state.pending_control_points_time = time;

        Ok(())
    }

    fn parse_colors(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_hit_objects(state: &mut Self::State, line: &str) -> Result<(), Self::Error> {
        let mut split = line.trim_comment().split(',');

        let (Some(x), Some(y), Some(start_time), Some(kind), Some(_sound_type)) = (
            split.next(),
            split.next(),
            split.next(),
            split.next(),
            split.next(),
        ) else {
            return Err(ParseBeatmapError::InvalidHitObjectLine);
        };

        let pos = Pos {
            x: x.parse_with_limits(MAX_COORDINATE_VALUE as f32)? as i32 as f32,
            y: y.parse_with_limits(MAX_COORDINATE_VALUE as f32)? as i32 as f32,
        };

        let start_time = f64::parse(start_time)?;
        let hit_object_type: HitObjectType = kind.parse()?;

        let kind = if hit_object_type.has_flag(HitObjectType::CIRCLE) {
            HitObjectKind::Circle
        } else if hit_object_type.has_flag(HitObjectType::SLIDER) {
            let (point_str, repeat_count) = split
                .next()
                .zip(split.next())
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?;

            let slides = repeat_count.parse_num::<i32>()?;

            if !(0..=MAX_REPEAT_COUNT).contains(&slides) {
                return Err(ParseBeatmapError::InvalidRepeatCount);
            }

            let mut len = None;

            if let Some(next) = split.next() {
                let new_len = next
                    .parse_with_limits(f64::from(MAX_COORDINATE_VALUE))?
                    .max(0.0);

                if new_len.not_eq(0.0) {
                    len = Some(new_len);
                }
            }

            state.convert_path_str(point_str, pos)?;
            let control_points = std::mem::take(&mut state.curve_points);

            HitObjectKind::Slider(Slider {
                expected_dist: len,
                repeats: (slides - 1).max(0) as usize,
                control_points: control_points.into_boxed_slice(),
            })
        } else if hit_object_type.has_flag(HitObjectType::SPINNER) {
            let end_time = split
                .next()
                .ok_or(ParseBeatmapError::InvalidHitObjectLine)?
                .parse_num::<f64>()?;

            HitObjectKind::Spinner(Spinner {
                duration: (end_time - start_time).max(0.0),
            })
        } else if hit_object_type.has_flag(HitObjectType::HOLD) {
            // Hold notes only ever matter as pauses in the object flow
            let end_time = match split.next().and_then(|s| s.split(':').next()) {
                Some(s) if !s.is_empty() => s.parse_num::<f64>()?.max(start_time),
                _ => start_time,
            };

            HitObjectKind::Spinner(Spinner {
                duration: end_time - start_time,
            })
        } else {
            return Err(ParseBeatmapError::UnknownHitObjectType);
        };

        state.hit_objects.push(HitObject {
            pos,
            start_time,
            kind,
        });

        Ok(())
    }

    fn parse_variables(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_catch_the_beat(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn parse_mania(_: &mut Self::State, _: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

trait Pending: Sized {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self>;

    fn push_front(self, state: &mut BeatmapState) {
        let pending = Self::pending(state);

        if pending.is_none() {
            *pending = Some(self);
        }
    }

    fn push_back(self, state: &mut BeatmapState) {
        *Self::pending(state) = Some(self);
    }
}

impl Pending for TimingPoint {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self> {
        &mut state.pending_timing_point
    }
}

impl Pending for DifficultyPoint {
    fn pending(state: &mut BeatmapState) -> &mut Option<Self> {
        &mut state.pending_difficulty_point
    }
}

impl ControlPoint<BeatmapState> for TimingPoint {
    fn check_already_existing(&self, _: &BeatmapState) -> bool {
        false
    }

    fn add(self, state: &mut BeatmapState) {
        match state
            .timing_points
            .binary_search_by(|probe| probe.time.total_cmp(&self.time))
        {
            Err(i) => state.timing_points.insert(i, self),
            Ok(i) => state.timing_points[i] = self,
        }
    }
}

impl ControlPoint<BeatmapState> for DifficultyPoint {
    fn check_already_existing(&self, state: &BeatmapState) -> bool {
        match difficulty_point_at(&state.difficulty_points, self.time) {
            Some(existing) => self.is_redundant(existing),
            None => self.is_redundant(&DifficultyPoint::default()),
        }
    }

    fn add(self, state: &mut BeatmapState) {
        match state
            .difficulty_points
            .binary_search_by(|probe| probe.time.total_cmp(&self.time))
        {
            Err(i) => state.difficulty_points.insert(i, self),
            Ok(i) => state.difficulty_points[i] = self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_line(line: &str) -> Result<BeatmapState, ParseBeatmapError> {
        let mut state = BeatmapState::create(14);
        <Beatmap as DecodeBeatmap>::parse_hit_objects(&mut state, line)?;

        Ok(state)
    }

    #[test]
    fn negative_repeat_count() {
        let res = parse_line("100,100,1000,2,0,L|200:100,-1,100");

        assert!(matches!(res, Err(ParseBeatmapError::InvalidRepeatCount)));
    }

    #[test]
    fn excessive_repeat_count() {
        let res = parse_line("100,100,1000,2,0,L|200:100,9001,100");

        assert!(matches!(res, Err(ParseBeatmapError::InvalidRepeatCount)));
    }

    #[test]
    fn slider_repeats() {
        let state = parse_line("100,100,1000,2,0,B|200:100|300:150,3,150").unwrap();

        let HitObjectKind::Slider(ref slider) = state.hit_objects[0].kind else {
            panic!("expected slider");
        };

        assert_eq!(slider.repeats, 2);
        assert_eq!(slider.expected_dist, Some(150.0));
        assert_eq!(slider.control_points.len(), 3);
    }

    #[test]
    fn spinner_duration() {
        let state = parse_line("256,192,1000,12,0,3000").unwrap();

        assert_eq!(
            state.hit_objects[0].kind,
            HitObjectKind::Spinner(Spinner { duration: 2000.0 })
        );
    }

    #[test]
    fn unknown_type() {
        assert!(matches!(
            parse_line("256,192,1000,0,0"),
            Err(ParseBeatmapError::UnknownHitObjectType)
        ));
    }
}
