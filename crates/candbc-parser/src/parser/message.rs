//! Message and signal constructs: `BO_`, `SG_`, `SIG_VALTYPE_`,
//! `BO_TX_BU_`, `SIG_GROUP_`, `SG_MUL_VAL_`.

use candbc_model::{
    layout, ByteOrder, ExtendedMultiplex, Message, Signal, SignalGroup, SignalShape, ValueKind,
    EXT_ID_LIMIT, INDEPENDENT_MSG_NAME, INDEPENDENT_MSG_RAW_ID, RAW_ID_EXTENDED_FLAG,
    STD_ID_LIMIT,
};

use super::{lexeme, DbcParser};
use crate::error::DbcError;
use crate::source::Source;

impl DbcParser {
    /// `BO_ <id> <name> : <size> <transmitter>` followed by any number
    /// of `SG_` signal definitions.
    ///
    /// The placeholder message named `VECTOR__INDEPENDENT_SIG_MSG` is
    /// special: its declared id is remembered so later id references
    /// resolve, it is stored under the reserved raw id, and repeated
    /// declarations merge into the one record (sizes accumulate,
    /// transmitters append) instead of being duplicates.
    pub(crate) fn read_message(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let declared_id =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting an ID for the message."))?;

        let name = lexeme::identifier(source);
        if name.is_empty() || lexeme::is_keyword(&name) {
            return Err(DbcError::new("Expecting a name for the message."));
        }

        let raw_id = if name == INDEPENDENT_MSG_NAME {
            self.indep_msg_id = declared_id;
            INDEPENDENT_MSG_RAW_ID
        } else {
            let id = declared_id & !RAW_ID_EXTENDED_FLAG;
            if declared_id & RAW_ID_EXTENDED_FLAG != 0 {
                if id >= EXT_ID_LIMIT {
                    return Err(DbcError::new(
                        "Specified extended message ID is larger than the 29 bits.",
                    ));
                }
            } else if id >= STD_ID_LIMIT {
                return Err(DbcError::new(
                    "Specified standard message ID is larger than the 11 bits.",
                ));
            }
            declared_id
        };

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'BO_' message definition",
            ));
        }

        let size =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting a size for the message."))?;

        let transmitter = lexeme::identifier(source);
        if transmitter.is_empty() {
            return Err(DbcError::new(
                "Expecting a transmitter name for the message.",
            ));
        }
        if !Self::is_unassigned_node(&transmitter) && !self.nodes.contains_key(&transmitter) {
            return Err(DbcError::new(
                "Expecting a valid pre-defined transmitter name for the message.",
            ));
        }

        // Insert into both registries atomically: if the id is already
        // taken, the name registration is rolled back.
        let msg_index = match self.msg_by_name.get(&name) {
            None => {
                let index = self.messages.len();
                self.messages.push(Message::default());
                self.msg_by_name.insert(name.clone(), index);
                if self.msg_by_id.contains_key(&raw_id) {
                    self.msg_by_name.shift_remove(&name);
                    self.messages.pop();
                    return Err(DbcError::with_args(
                        "Failed to construct message definition for '%1' and ID %2.",
                        &[&name, &raw_id],
                    ));
                }
                self.msg_by_id.insert(raw_id, index);
                index
            }
            Some(&index) => {
                if name != INDEPENDENT_MSG_NAME {
                    return Err(DbcError::with_args(
                        "Duplicate message definition for ID '%1' and ID %2.",
                        &[&name, &raw_id],
                    ));
                }
                index
            }
        };

        let message = &mut self.messages[msg_index];
        message.name = name;
        message.raw_id = raw_id;
        message.size = message.size.saturating_add(size);
        message.transmitters.push(transmitter);

        // Speculative lookahead: consume the next identifier only when
        // it opens a signal definition.
        loop {
            let mark = source.mark();
            if lexeme::identifier(source) != "SG_" {
                source.reset(mark);
                break;
            }
            self.read_signal(source, msg_index)?;
        }
        Ok(())
    }

    /// `SG_ <name> [m<case>][M] : <start>|<size>@<order><sign>
    /// (<factor>,<offset>) [<min>|<max>] "<unit>" <receiver>,*`
    fn read_signal(&mut self, source: &mut Source, msg_index: usize) -> Result<(), DbcError> {
        let mut signal = Signal {
            message_raw_id: self.messages[msg_index].raw_id,
            ..Signal::default()
        };

        signal.name = lexeme::identifier(source);
        if signal.name.is_empty() || lexeme::is_keyword(&signal.name) {
            return Err(DbcError::new("Expecting a name for the signal."));
        }
        if self.messages[msg_index].signal(&signal.name).is_some() {
            return Err(DbcError::new("Duplicate signal defined within the message."));
        }

        // A signal can be a multiplexed value, the multiplexor switch,
        // or both at once.
        if lexeme::expect_char(source, 'm') {
            signal.multiplexing.muxed = true;
            signal.multiplexing.case_value = lexeme::int(source)
                .ok_or_else(|| DbcError::new("Expecting a multiplexed switch case value."))?;
        }
        if lexeme::expect_char(source, 'M') {
            signal.multiplexing.switch = true;
        }

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'SG_' signal definition",
            ));
        }

        let msg_raw_id = self.messages[msg_index].raw_id;
        let msg_size = self.messages[msg_index].size;

        signal.start_bit =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the start bit."))?;
        if msg_raw_id != INDEPENDENT_MSG_RAW_ID
            && u64::from(signal.start_bit) >= 8 * u64::from(msg_size)
        {
            return Err(DbcError::new(
                "Start bit has been defined beyond the size of the message.",
            ));
        }

        if !lexeme::expect_char(source, '|') {
            return Err(DbcError::new(
                "Pipe '|' expected following start bit in the signal definition",
            ));
        }

        signal.shape = read_signal_shape(source)?;

        // The occupied area depends on the byte order; the placeholder
        // message has no meaningful size to check against.
        if msg_raw_id != INDEPENDENT_MSG_RAW_ID
            && !layout::signal_fits(
                signal.shape.byte_order,
                signal.start_bit,
                signal.shape.size,
                msg_size,
            )
        {
            return Err(DbcError::new(
                "The length of the signal positioned at the start bit exceeds the length of the message.",
            ));
        }

        loop {
            let receiver = lexeme::identifier(source);
            if receiver.is_empty() || lexeme::is_keyword(&receiver) {
                return Err(DbcError::new("Expecting a receiver for the signal."));
            }
            if !Self::is_unassigned_node(&receiver) && !self.nodes.contains_key(&receiver) {
                return Err(DbcError::new(
                    "Expecting a valid pre-defined receiver name for the signal.",
                ));
            }
            if signal.receivers.contains(&receiver) {
                return Err(DbcError::new(
                    "Duplicate receiver name defined for the signal.",
                ));
            }
            signal.receivers.push(receiver);

            if !lexeme::expect_char(source, ',') {
                break;
            }
        }

        self.messages[msg_index].signals.push(signal);
        Ok(())
    }

    /// `SIG_VALTYPE_ <id> <signal> [:] <0|1|2> ;`; promotes the value
    /// kind of an integer signal to float or double.
    pub(crate) fn read_signal_value_type(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let raw_id =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the message ID."))?;
        let msg_index = self.message_index_by_id(raw_id)?;

        let name = lexeme::identifier(source);
        let sig_index = self.signal_index(msg_index, &name)?;

        // The format description has no colon here; CANdb++ emits one.
        lexeme::expect_char(source, ':');

        let value_type =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the value type (0..2)."))?;
        let signal = &mut self.messages[msg_index].signals[sig_index];
        match value_type {
            0 => {} // signed/unsigned integer, as declared
            1 => signal.shape.value_kind = ValueKind::Float,
            2 => signal.shape.value_kind = ValueKind::Double,
            _ => return Err(DbcError::new("Invalid value type (0..2).")),
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new("Semi-colon ';' expected."));
        }
        Ok(())
    }

    /// `BO_TX_BU_ <id> : <transmitter>* ;`; additional transmitters
    /// appended to the ones from the `BO_` line.
    pub(crate) fn read_message_transmitters(
        &mut self,
        source: &mut Source,
    ) -> Result<(), DbcError> {
        let raw_id =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the message ID."))?;
        let msg_index = self.message_index_by_id(raw_id)?;

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'BO_TX_BU_' message transmitters definition",
            ));
        }

        loop {
            if lexeme::expect_char(source, ';') {
                break;
            }

            let transmitter = lexeme::identifier(source);
            if transmitter.is_empty() {
                return Err(DbcError::new(
                    "Expecting a transmitter name for the message.",
                ));
            }
            if !Self::is_unassigned_node(&transmitter) && !self.nodes.contains_key(&transmitter) {
                return Err(DbcError::new(
                    "Expecting a valid pre-defined transmitter name for the message.",
                ));
            }
            let message = &mut self.messages[msg_index];
            if message.transmitters.contains(&transmitter) {
                return Err(DbcError::new("Duplicate transmitter defined for the message."));
            }
            message.transmitters.push(transmitter);
        }
        Ok(())
    }

    /// `SIG_GROUP_ <id> <name> <repetitions> : <signal>[,]* ;`
    pub(crate) fn read_signal_group(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let raw_id = lexeme::uint(source).ok_or_else(|| DbcError::new("No message ID supplied."))?;
        let msg_index = self.message_index_by_id(raw_id)?;

        let name = lexeme::identifier(source);
        if name.is_empty() {
            return Err(DbcError::new("Missing signal group name."));
        }
        if lexeme::is_keyword(&name) {
            return Err(DbcError::new("Invalid signal group name."));
        }
        if self.messages[msg_index].signal_groups.contains_key(&name) {
            return Err(DbcError::new("Duplicate signal group definition."));
        }

        let repetitions = lexeme::uint(source).ok_or_else(|| {
            DbcError::new("Expected repetition factor following the signal group name.")
        })?;

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'SIG_GROUP_' signal group definition",
            ));
        }

        let mut group = SignalGroup {
            name: name.clone(),
            repetitions,
            signals: Vec::new(),
        };
        loop {
            if lexeme::expect_char(source, ';') {
                break;
            }

            let signal_name = lexeme::identifier(source);
            if signal_name.is_empty() {
                return Err(DbcError::new("Expecting a signal name."));
            }
            self.signal_index(msg_index, &signal_name)?;
            group.signals.push(signal_name);

            // The format description has no comma; exports carry one.
            lexeme::expect_char(source, ',');
        }

        self.messages[msg_index].signal_groups.insert(name, group);
        Ok(())
    }

    /// `SG_MUL_VAL_ <id> <muxed signal> <multiplexor> (<low>-<high>[,])* ;`
    ///
    /// The multiplexor gains its switch flag here even when its `SG_`
    /// line never carried an `M`.
    pub(crate) fn read_extended_multiplex(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let raw_id =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the message ID."))?;
        let msg_index = self.message_index_by_id(raw_id)?;

        let muxed_name = lexeme::identifier(source);
        let muxed_index = self
            .signal_index(msg_index, &muxed_name)
            .map_err(|_| DbcError::new("Could not find multiplexed signal with supplied name."))?;

        let multiplexor_name = lexeme::identifier(source);
        let multiplexor_index = self
            .signal_index(msg_index, &multiplexor_name)
            .map_err(|_| DbcError::new("Could not find multiplexor signal with supplied name."))?;
        self.messages[msg_index].signals[multiplexor_index]
            .multiplexing
            .switch = true;

        let mut ranges = Vec::new();
        while let Some(low) = lexeme::uint(source) {
            if !lexeme::expect_char(source, '-') {
                return Err(DbcError::new(
                    "Expecting dash '-' between low and high range value for a multiplexed signal.",
                ));
            }
            let high = lexeme::uint(source)
                .ok_or_else(|| DbcError::new("Missing high range value for a multiplexed signal."))?;
            ranges.push((low, high));

            // The format description has no comma; exports carry one.
            lexeme::expect_char(source, ',');
        }

        self.messages[msg_index].signals[muxed_index]
            .extended_multiplex
            .push(ExtendedMultiplex {
                multiplexor: multiplexor_name,
                ranges,
            });

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the extended multiplexer definition 'SG_MUL_VAL_'",
            ));
        }
        Ok(())
    }
}

/// Read the layout/scaling bundle shared by `SG_` and the name form of
/// `SGTYPE_`: `<size>@<order><sign> (<factor>,<offset>)
/// [<min>|<max>] "<unit>"`.
pub(crate) fn read_signal_shape(source: &mut Source) -> Result<SignalShape, DbcError> {
    let mut shape = SignalShape::default();

    shape.size =
        lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the signal size."))?;

    if !lexeme::expect_char(source, '@') {
        return Err(DbcError::new(
            "At-sign '@' expected following size in the signal definition",
        ));
    }

    let byte_order = lexeme::uint(source)
        .ok_or_else(|| DbcError::new("Expecting the byte order indicator."))?;
    shape.byte_order = match byte_order {
        0 => ByteOrder::BigEndian,
        1 => ByteOrder::LittleEndian,
        _ => {
            return Err(DbcError::new(
                "Invalid byte order indicator for the signal (0=big endian or 1=little endian are allowed).",
            ))
        }
    };

    if lexeme::expect_char(source, '+') {
        shape.value_kind = ValueKind::Unsigned;
    } else if lexeme::expect_char(source, '-') {
        shape.value_kind = ValueKind::Signed;
    } else {
        return Err(DbcError::new(
            "Invalid value type ('+'=unsigned or '-'=signed are allowed).",
        ));
    }

    if !lexeme::expect_char(source, '(') {
        return Err(DbcError::new(
            "Left bracket '(' expected following the value type in the signal definition",
        ));
    }

    shape.factor =
        lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the factor value."))?;
    if shape.factor == 0.0 {
        return Err(DbcError::new("A factor value of 0 is not valid."));
    }

    if !lexeme::expect_char(source, ',') {
        return Err(DbcError::new(
            "Comma ',' expected following the factor value in the signal definition",
        ));
    }

    shape.offset =
        lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the offset value."))?;

    if !lexeme::expect_char(source, ')') {
        return Err(DbcError::new(
            "Right bracket ')' expected following the offset value in the signal definition",
        ));
    }

    if !lexeme::expect_char(source, '[') {
        return Err(DbcError::new(
            "Left square-bracket '[' expected following the factor and offset in the signal definition",
        ));
    }

    shape.minimum =
        lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the minimum value."))?;

    if !lexeme::expect_char(source, '|') {
        return Err(DbcError::new(
            "Pipe '|' expected following the minimum in the signal definition",
        ));
    }

    shape.maximum =
        lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the maximum value."))?;

    if !lexeme::expect_char(source, ']') {
        return Err(DbcError::new(
            "Right square-bracket ']' expected following the maximum in the signal definition",
        ));
    }

    shape.unit = lexeme::string(source).ok_or_else(|| {
        DbcError::new("String expected following the minimum and maximum in the signal definition")
    })?;

    Ok(shape)
}
