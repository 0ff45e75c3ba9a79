/*!
 * Tests for notation to plain text conversion
 */

use televox::notation::{NotationFormat, to_plain};

#[test]
fn test_to_plain_withMixedMarkers_shouldReduceToTextAndEllipses() {
    assert_eq!(to_plain("**hi** • _soft_ //"), "hi ... soft ... ... ...");
}

#[test]
fn test_to_plain_withoutMarkers_shouldCollapseWhitespace() {
    assert_eq!(to_plain("  Hello   world\n  again  "), "Hello world again");
}

#[test]
fn test_to_plain_withLongPause_shouldUseTwoEllipses() {
    assert_eq!(to_plain("Wait • • • go"), "Wait ... ... go");
}

#[test]
fn test_to_plain_withLoneBeat_shouldUseThreeEllipses() {
    assert_eq!(to_plain("//"), "... ... ...");
}

#[test]
fn test_to_plain_withEveryDelimiter_shouldKeepInnerText() {
    assert_eq!(
        to_plain("<<slow>> >>fast<< ^up^ ,down, ~hush~"),
        "slow fast up down hush"
    );
}

#[test]
fn test_to_plain_withAllCaps_shouldLeaveWordUnchanged() {
    assert_eq!(to_plain("STOP now"), "STOP now");
}

#[test]
fn test_to_plain_withStyleDirective_shouldPassThrough() {
    assert_eq!(to_plain("{sad,0.5:oh no}"), "{sad,0.5:oh no}");
}

#[test]
fn test_to_plain_withLegacyTags_shouldStripThem() {
    assert_eq!(to_plain("<b>big</b> news"), "big news");
}

#[test]
fn test_to_plain_withEmptyInput_shouldReturnEmpty() {
    assert_eq!(to_plain(""), "");
}

#[test]
fn test_notationFormat_plain_shouldIgnoreVoice() {
    assert_eq!(NotationFormat::Plain.render("**a** b", "Rachel"), "a b");
}

#[test]
fn test_to_plain_withTagBeforeFastMarker_shouldStripTag() {
    assert_eq!(to_plain("<b>bold</b>>>fast<<"), "boldfast");
}

#[test]
fn test_to_plain_withTagBeforeLiteralAngle_shouldStripTag() {
    assert_eq!(to_plain("<b>x</b>> done"), "x> done");
}

#[test]
fn test_to_plain_withTagAfterFastMarker_shouldStripTag() {
    assert_eq!(to_plain(">>fast<<<b>x</b>"), "fastx");
}

#[test]
fn test_to_plain_withLegacyTagsAroundCaps_shouldNotLeakTags() {
    let plain = to_plain("<em>STOP</em>>> now");
    assert_eq!(plain, "STOP>> now");
    assert!(!plain.contains("</"));
}
