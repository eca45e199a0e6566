use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};
use storefront_ui::{Page, PageConfig};

const CAROUSEL_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/carousel_property_test.txt";
const DEFAULT_CAROUSEL_PROPTEST_CASES: u32 = 128;

#[derive(Clone, Debug)]
enum HeroAction {
    Previous,
    Next,
    Page(usize),
    ToggleMenu,
}

fn carousel_proptest_cases() -> u32 {
    std::env::var("STOREFRONT_UI_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_CAROUSEL_PROPTEST_CASES)
}

fn hero_html(slides: usize, active: usize) -> String {
    let mut items = String::new();
    let mut pages = String::new();
    for index in 0..slides {
        let (slide_marker, page_marker) = if index == active {
            (" hero__item--active", " hero__pagination-item--active")
        } else {
            ("", "")
        };
        items.push_str(&format!(
            "<li id='slide-{index}' class='hero__item{slide_marker}'></li>"
        ));
        pages.push_str(&format!(
            "<li id='page-{index}' class='hero__pagination-item{page_marker}'></li>"
        ));
    }
    format!(
        "<nav class='main-nav main-nav--closed'><button class='main-nav__toggle'></button></nav>\
         <ul>{items}</ul>\
         <button class='hero__page-button--before'></button>\
         <button class='hero__page-button--after'></button>\
         <ul>{pages}</ul>\
         <div class='form__slider'></div>\
         <input class='form__slider-min'><input class='form__slider-max'>"
    )
}

fn hero_strategy() -> BoxedStrategy<(usize, usize, Vec<HeroAction>)> {
    (1usize..=6)
        .prop_flat_map(|slides| {
            let action = prop_oneof![
                3 => Just(HeroAction::Previous),
                3 => Just(HeroAction::Next),
                2 => (0..slides).prop_map(HeroAction::Page),
                1 => Just(HeroAction::ToggleMenu),
            ];
            (Just(slides), 0..slides, vec(action, 1..=24))
        })
        .boxed()
}

fn fail(err: storefront_ui::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn expected_after(active: usize, slides: usize, action: &HeroAction) -> usize {
    match action {
        HeroAction::Previous => active.saturating_sub(1),
        HeroAction::Next => (active + 1).min(slides - 1),
        HeroAction::Page(target) => *target,
        HeroAction::ToggleMenu => active,
    }
}

fn assert_hero_sequence(slides: usize, start: usize, actions: &[HeroAction]) -> TestCaseResult {
    let mut page = Page::boot(&hero_html(slides, start), &PageConfig::default()).map_err(fail)?;
    let mut active = start;
    let mut menu_open = false;

    for (step, action) in actions.iter().enumerate() {
        let outcome = match action {
            HeroAction::Previous => page.click(".hero__page-button--before"),
            HeroAction::Next => page.click(".hero__page-button--after"),
            HeroAction::Page(index) => page.click(&format!("#page-{index}")),
            HeroAction::ToggleMenu => page.click(".main-nav__toggle"),
        };
        outcome.map_err(fail)?;
        active = expected_after(active, slides, action);
        if matches!(action, HeroAction::ToggleMenu) {
            menu_open = !menu_open;
        }

        let dom = page.dom();
        let marked = dom
            .query_selector_all(".hero__item--active")
            .map_err(fail)?;
        prop_assert_eq!(
            marked.len(),
            1,
            "step {} {:?}: expected one active slide",
            step,
            action
        );
        prop_assert_eq!(
            dom.attr(marked[0], "id"),
            Some(format!("slide-{active}")),
            "step {} {:?}",
            step,
            action
        );
        let marked_pages = dom
            .query_selector_all(".hero__pagination-item--active")
            .map_err(fail)?;
        prop_assert_eq!(marked_pages.len(), 1);
        prop_assert_eq!(dom.attr(marked_pages[0], "id"), Some(format!("page-{active}")));

        page.assert_disabled(".hero__page-button--before", active == 0)
            .map_err(fail)?;
        page.assert_disabled(".hero__page-button--after", active + 1 == slides)
            .map_err(fail)?;
        page.assert_class(".main-nav", "main-nav--opened", menu_open)
            .map_err(fail)?;
        page.assert_class(".main-nav", "main-nav--closed", !menu_open)
            .map_err(fail)?;
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: carousel_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(CAROUSEL_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn hero_keeps_exactly_one_active_slide((slides, start, actions) in hero_strategy()) {
        assert_hero_sequence(slides, start, &actions)?;
    }
}
