use dsa_core::model::{Difficulty, McqOption, Platform, Topic, UserId};
use dsa_core::time::fixed_now;
use dsa_core::TopicProgress;
use services::{AppServices, Clock, ProgressTracker};
use storage::repository::{NewMcqRecord, NewProblemRecord, NewVideoRecord, Storage};

async fn seed_sorting(storage: &Storage) {
    for i in 0..4 {
        storage
            .content
            .insert_video(NewVideoRecord {
                topic: Topic::Sorting,
                difficulty: Difficulty::Beginner,
                title: format!("Sorting {i}"),
                description: None,
                video_url: format!("https://www.youtube.com/watch?v=s{i}"),
                platform: "YouTube".into(),
                duration_minutes: Some(8),
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        storage
            .content
            .insert_problem(NewProblemRecord {
                topic: Topic::Sorting,
                difficulty: Difficulty::Medium,
                title: format!("Sort {i}"),
                description: None,
                problem_url: format!("https://leetcode.com/problems/sort-{i}/"),
                platform: Platform::Leetcode,
                tags: vec!["sorting".into()],
                created_at: fixed_now(),
            })
            .await
            .unwrap();
    }
}

async fn add_mcq(storage: &Storage, topic: Topic) {
    storage
        .content
        .insert_mcq(NewMcqRecord {
            topic,
            difficulty: Difficulty::Beginner,
            question: "Stable?".into(),
            options: ["yes".into(), "no".into(), "maybe".into(), "never".into()],
            correct: McqOption::A,
            explanation: None,
            created_at: fixed_now(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn learner_journey_updates_dashboard() {
    let storage = Storage::in_memory();
    seed_sorting(&storage).await;
    let app = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    let user = UserId::random();

    let page = app.topic_content().topic_content(Topic::Sorting).await.unwrap();
    app.videos().mark_completed(user, page.videos[0].id).await.unwrap();
    app.videos().mark_completed(user, page.videos[1].id).await.unwrap();
    app.coding()
        .set_solved(user, page.problems[2].id, true)
        .await
        .unwrap();

    let cards = app.dashboard().topic_cards(Some(user)).await;
    let sorting = cards.iter().find(|c| c.topic == Topic::Sorting).unwrap();
    assert_eq!(sorting.progress, 38);
    assert_eq!(
        sorting.state.progress(),
        TopicProgress {
            video: 50,
            mcq: 0,
            coding: 25,
            overall: 38,
        }
    );

    let anonymous = app.dashboard().topic_cards(None).await;
    assert!(anonymous.iter().all(|c| c.progress == 0));
}

#[tokio::test]
async fn switching_users_discards_the_slow_result() {
    let storage = Storage::in_memory();
    add_mcq(&storage, Topic::Basics).await;
    let app = AppServices::from_storage(&storage, Clock::fixed(fixed_now()));
    let alice = UserId::random();
    let bob = UserId::random();
    let mcq = app
        .topic_content()
        .topic_content(Topic::Basics)
        .await
        .unwrap()
        .mcqs[0]
        .id;
    app.mcqs().submit_answer(alice, mcq, McqOption::B).await.unwrap();

    let tracker = ProgressTracker::new();
    let slow = tracker.begin(Topic::Basics, Some(alice));
    let fast = tracker.begin(Topic::Basics, Some(bob));

    let bob_state = app.aggregator().compute_progress(fast.topic, fast.user).await;
    assert!(tracker.apply(&fast, bob_state));
    let alice_state = app.aggregator().compute_progress(slow.topic, slow.user).await;
    assert_eq!(alice_state.progress().mcq, 100);
    assert!(!tracker.apply(&slow, alice_state));

    assert_eq!(tracker.current().progress(), TopicProgress::ZERO);
}

#[tokio::test]
async fn sqlite_backed_services_compute_progress() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_services_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
    )
    .await
    .expect("sqlite services");
    let storage = Storage::sqlite("sqlite:file:memdb_services_flow?mode=memory&cache=shared")
        .await
        .expect("same database");
    add_mcq(&storage, Topic::Searching).await;
    add_mcq(&storage, Topic::Searching).await;
    let user = UserId::random();

    let quiz = app
        .quizzes()
        .load_quiz(Topic::Searching, Difficulty::Beginner, false)
        .await
        .unwrap();
    let outcome = app
        .quizzes()
        .submit_quiz(user, &quiz, &[Some(McqOption::A), None], 5)
        .await
        .unwrap();
    assert_eq!(outcome.grade.correct, 1);

    let progress = app
        .aggregator()
        .try_compute_progress(Topic::Searching, Some(user))
        .await
        .unwrap();
    assert_eq!(progress.mcq, 100);
    assert_eq!(progress.overall, 100);
}
