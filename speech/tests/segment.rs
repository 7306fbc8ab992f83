use speech::segment;

#[test]
fn splits_on_terminal_punctuation() {
    assert_eq!(
        segment("Bonjour. Comment vas-tu?"),
        vec!["Bonjour.", "Comment vas-tu?"]
    );
}

#[test]
fn keeps_the_terminator_with_its_sentence() {
    assert_eq!(
        segment("Incroyable! Vraiment? Oui."),
        vec!["Incroyable!", "Vraiment?", "Oui."]
    );
}

#[test]
fn runs_of_terminators_stay_together() {
    assert_eq!(segment("Quoi?! Rien..."), vec!["Quoi?!", "Rien..."]);
}

#[test]
fn text_without_terminator_is_one_unit() {
    assert_eq!(segment("pas de ponctuation"), vec!["pas de ponctuation"]);
}

#[test]
fn blank_input_yields_nothing() {
    assert!(segment("").is_empty());
    assert!(segment("   \n\t ").is_empty());
}

#[test]
fn whitespace_runs_are_normalized() {
    assert_eq!(
        segment("Un.   Deux.\n\nTrois."),
        vec!["Un.", "Deux.", "Trois."]
    );
}

#[test]
fn unterminated_trailer_is_dropped() {
    assert_eq!(segment("Fini. reste"), vec!["Fini."]);
}

#[test]
fn rejoining_and_resegmenting_is_stable() {
    let units = segment("Bonjour. Comment vas-tu? Bien!");
    let rejoined = units.join(" ");
    assert_eq!(segment(&rejoined), units);
}
