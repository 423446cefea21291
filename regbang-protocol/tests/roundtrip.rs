//! Property tests: every valid transaction survives encode then decode.

use proptest::prelude::*;
use regbang_hal::{BitTiming, Logic};
use regbang_protocol::{decode, encode, FrameLayout, Transaction};

fn any_transaction() -> impl Strategy<Value = Transaction> {
    prop_oneof![
        any::<u32>().prop_map(Transaction::read),
        (any::<u32>(), any::<u32>(), 0u8..=0x0F).prop_map(|(address, data, be)| {
            Transaction::write(address, data, be).expect("mask fits the low nibble")
        }),
    ]
}

fn any_layout() -> impl Strategy<Value = FrameLayout> {
    (any::<bool>(), any::<bool>()).prop_map(|(read_reserved, write_reserved)| FrameLayout {
        read_reserved,
        write_reserved,
    })
}

proptest! {
    #[test]
    fn roundtrip_any_transaction(
        tx in any_transaction(),
        layout in any_layout(),
        oversample in 1u32..=16,
        baud in prop::sample::select(vec![9_600u32, 115_200, 1_000_000]),
        idle in 0usize..64,
    ) {
        let timing = BitTiming::from_baud(baud).unwrap();
        let cells = encode(&tx, layout, timing).unwrap();

        let frame_len = layout.frame_len(tx.direction());
        prop_assert_eq!(cells.len(), frame_len * 10);
        prop_assert_eq!(cells.total_duration_ps(), 10 * frame_len as u64 * timing.period_ps());

        let stream = std::iter::repeat(Logic::High)
            .take(idle)
            .chain(cells.samples(oversample));
        prop_assert_eq!(decode(stream, oversample, layout), Ok(tx));
    }

    #[test]
    fn frame_bytes_match_fields(tx in any_transaction()) {
        let bytes = tx.encode_to_vec(FrameLayout::CANONICAL).unwrap();
        prop_assert_eq!(bytes[0], 0xA5);
        prop_assert_eq!(bytes[1], 0x01);
        prop_assert_eq!(&bytes[4..8], &tx.address().to_le_bytes()[..]);
        if let Some(data) = tx.data() {
            prop_assert_eq!(&bytes[8..12], &data.to_le_bytes()[..]);
        }
    }
}
