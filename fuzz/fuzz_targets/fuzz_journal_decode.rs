#![no_main]

use libfuzzer_sys::fuzz_target;

use jury_registry::EventJournal;

// Decoding arbitrary bytes must never panic, and anything that decodes must
// survive a re-encode unchanged.
fuzz_target!(|data: &[u8]| {
    if let Ok(journal) = EventJournal::decode(data) {
        let bytes = journal.encode().expect("decoded journal re-encodes");
        let again = EventJournal::decode(&bytes).expect("re-encoded journal decodes");
        assert_eq!(again, journal);
    }
});
