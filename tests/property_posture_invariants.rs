use proptest::prelude::*;

use posture_core::{
    analyze_batch, angle_at_vertex, FrameInput, Joint, LandmarkSet, Point, PostureType,
    SessionSummary, Timing,
};

fn point() -> impl Strategy<Value = Point> {
    (0.0_f64..1.0, 0.0_f64..1.0).prop_map(|(x, y)| Point::new(x, y))
}

/// Every joint either evaluator can read, on both sides.
fn full_body() -> impl Strategy<Value = LandmarkSet> {
    proptest::collection::vec(point(), Joint::COUNT).prop_map(|points| {
        LandmarkSet::from_indexed(&points).expect("33 finite points")
    })
}

fn frame() -> impl Strategy<Value = Option<LandmarkSet>> {
    prop_oneof![1 => Just(None), 4 => full_body().prop_map(Some)]
}

fn posture_type() -> impl Strategy<Value = PostureType> {
    prop_oneof![Just(PostureType::Squat), Just(PostureType::Sitting)]
}

proptest! {
    #[test]
    fn pt_angle_in_range_and_symmetric(a in point(), b in point(), c in point()) {
        if let Ok(angle) = angle_at_vertex(a, b, c) {
            prop_assert!((0.0..=180.0).contains(&angle));
            let reversed = angle_at_vertex(c, b, a).unwrap();
            prop_assert!((angle - reversed).abs() < 1e-9);
        }
    }

    #[test]
    fn pt_batch_accounts_for_every_frame(
        landmarks in proptest::collection::vec(frame(), 0..40),
        posture in posture_type(),
        fps in 1.0_f64..120.0,
    ) {
        let frames: Vec<FrameInput> = landmarks
            .into_iter()
            .enumerate()
            .map(|(i, l)| FrameInput::new(i as u64 + 1, l))
            .collect();
        let report = analyze_batch(&frames, posture, Timing::video(fps).unwrap());

        prop_assert_eq!(report.frame_count(), frames.len());
        prop_assert!(report.evaluated_frames.windows(2).all(|w| w[0] < w[1]));
        for (index, result) in report.indexed_results() {
            prop_assert_eq!(result.timestamp, index as f64 / fps);
            prop_assert_eq!(result.posture_type, posture);
            prop_assert_eq!(result.is_good_posture, result.warnings.is_empty());
        }
    }

    #[test]
    fn pt_summary_matches_results(
        landmarks in proptest::collection::vec(full_body(), 1..20),
        posture in posture_type(),
    ) {
        let frames: Vec<FrameInput> = landmarks
            .into_iter()
            .map(|l| FrameInput { frame_index: None, landmarks: Some(l) })
            .collect();
        let report = analyze_batch(&frames, posture, Timing::Image);
        let summary = SessionSummary::from_results(&report.results);

        prop_assert_eq!(summary.evaluated_frames, report.results.len() as u64);
        let good = report.results.iter().filter(|r| r.is_good_posture).count() as u64;
        prop_assert_eq!(summary.good_frames, good);
        prop_assert!((0.0..=1.0).contains(&summary.good_ratio));
        let warned: u64 = summary.warning_counts.iter().map(|w| w.count).sum();
        let expected: usize = report.results.iter().map(|r| r.warnings.len()).sum();
        prop_assert_eq!(warned, expected as u64);
    }

    #[test]
    fn pt_analysis_is_deterministic(body in full_body(), posture in posture_type()) {
        let frames = vec![FrameInput::new(1, Some(body))];
        let timing = Timing::video(30.0).unwrap();
        prop_assert_eq!(
            analyze_batch(&frames, posture, timing),
            analyze_batch(&frames, posture, timing)
        );
    }
}
