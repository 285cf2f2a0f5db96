use std::{
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
};

use aht10::Aht10;
use chrono::Local;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use vl53l0x::Vl53l0x;

use crate::{Datalog, Error, LogRecord};

/// The polling loop. Owns both sensors, the datalog and the delay provider.
pub struct Acquisition<A, V, D> {
    aht10: Aht10<A>,
    vl53l0x: Option<Vl53l0x<V>>,
    datalog: Datalog,
    delay: D,
    interval_ms: u32,
}

impl<A, V, D> Acquisition<A, V, D>
where
    A: I2c<SevenBitAddress>,
    V: I2c<SevenBitAddress>,
    D: DelayNs,
{
    pub fn new(
        aht10: Aht10<A>,
        vl53l0x: Option<Vl53l0x<V>>,
        datalog: Datalog,
        delay: D,
        interval_ms: u32,
    ) -> Self {
        Self {
            aht10,
            vl53l0x,
            datalog,
            delay,
            interval_ms,
        }
    }

    /// Run one poll cycle and write the record to the datalog and `out`.
    ///
    /// The humidity/temperature transactions finish before the distance
    /// transactions start, and both finish before the write.
    pub fn cycle<W: Write>(&mut self, out: &mut W) -> Result<LogRecord, Error> {
        let timestamp = Local::now();

        let reading = self.aht10.measure(&mut self.delay).map_err(Error::aht10)?;
        if reading.status.busy() {
            log::warn!(
                "[AHT] 0x{:02x}> Busy flag set after conversion delay, data may be stale",
                self.aht10.address()
            );
        }
        if !reading.status.calibrated() {
            log::warn!(
                "[AHT] 0x{:02x}> Calibration flag clear",
                self.aht10.address()
            );
        }

        let distance_mm = match self.vl53l0x.as_mut() {
            Some(tof) => Some(tof.read_distance().map_err(Error::vl53l0x)?),
            None => None,
        };

        let record = LogRecord {
            timestamp,
            humidity_percent: reading.humidity.percentage(),
            temperature_celsius: reading.temperature.celsius(),
            distance_mm,
        };
        self.datalog.append(&record).map_err(Error::File)?;
        writeln!(out, "{record}").map_err(Error::Output)?;
        log::debug!("[LOG] Raw AHT10 status 0x{:02x}", reading.status.into_bits());
        Ok(record)
    }

    /// Poll until `running` is cleared, then hand both buses back.
    ///
    /// `running` is only checked between cycles, so a cycle that has started
    /// always completes its write.
    pub fn run<W: Write>(
        mut self,
        running: &AtomicBool,
        out: &mut W,
    ) -> Result<(A, Option<V>), Error> {
        let mut cycles = 0u64;
        while running.load(Ordering::Relaxed) {
            self.cycle(out)?;
            cycles += 1;
            self.delay.delay_ms(self.interval_ms);
        }
        log::info!("[LOG] Stopping after {cycles} cycles");
        self.datalog.flush().map_err(Error::File)?;
        Ok(self.release())
    }

    /// Hand both buses back. The datalog is closed when dropped here.
    pub fn release(self) -> (A, Option<V>) {
        (self.aht10.release(), self.vl53l0x.map(Vl53l0x::release))
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::atomic::AtomicUsize};

    use aht10::Aht10Builder;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
    };
    use vl53l0x::Vl53l0xBuilder;

    use super::*;
    use crate::datalog::tests::TempLog;

    const AHT: u8 = 0x38;
    const TOF: u8 = 0x29;
    // status: calibrated, humidity 0x80000 (50 %), temperature 0x60000 (25 C)
    const AHT_RAW: [u8; 6] = [0x08, 0x80, 0x00, 0x06, 0x00, 0x00];

    fn aht_init() -> Vec<I2cTransaction> {
        vec![I2cTransaction::write(AHT, vec![0xBE, 0x08, 0x00])]
    }

    fn aht_cycle() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(AHT, vec![0xAC, 0x33, 0x00]),
            I2cTransaction::read(AHT, AHT_RAW.to_vec()),
        ]
    }

    fn tof_init() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(TOF, vec![0x88, 0x00]),
            I2cTransaction::write(TOF, vec![0x80, 0x01]),
            I2cTransaction::write(TOF, vec![0xFF, 0x01]),
            I2cTransaction::write(TOF, vec![0x00, 0x00]),
            I2cTransaction::write(TOF, vec![0x00, 0x02]),
        ]
    }

    fn tof_cycle() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write(TOF, vec![0x14]),
            I2cTransaction::read(TOF, vec![0x5A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01, 0x2C]),
        ]
    }

    fn build(
        aht: &[I2cTransaction],
        tof: Option<&[I2cTransaction]>,
        log: &TempLog,
    ) -> Acquisition<I2cMock, I2cMock, NoopDelay> {
        let mut delay = NoopDelay::new();
        let aht10 = Aht10Builder::default()
            .build(I2cMock::new(aht), &mut delay)
            .unwrap();
        let vl53l0x = tof.map(|t| {
            Vl53l0xBuilder::default()
                .build(I2cMock::new(t), &mut delay)
                .unwrap()
        });
        let datalog = Datalog::open(&log.0, vl53l0x.is_some()).unwrap();
        Acquisition::new(aht10, vl53l0x, datalog, delay, 1000)
    }

    /// Clears the run flag on its first call, as an interrupt arriving while
    /// the loop is busy would.
    struct InterruptingDelay<'a> {
        running: &'a AtomicBool,
        calls: &'a AtomicUsize,
    }

    impl DelayNs for InterruptingDelay<'_> {
        fn delay_ns(&mut self, _ns: u32) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.running.store(false, Ordering::Relaxed);
        }
    }

    #[test]
    fn one_cycle_writes_one_row() {
        let tmp = TempLog::new("cycle");
        let aht = [aht_init(), aht_cycle()].concat();
        let tof = [tof_init(), tof_cycle()].concat();
        let mut acq = build(&aht, Some(&tof), &tmp);

        let mut out: Vec<u8> = Vec::new();
        let record = acq.cycle(&mut out).unwrap();
        assert_eq!(record.humidity_percent, 50.0);
        assert_eq!(record.temperature_celsius, 25.0);
        assert_eq!(record.distance_mm, Some(300));

        let (mut aht_bus, tof_bus) = acq.release();
        aht_bus.done();
        tof_bus.expect("distance sensor enabled").done();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.ends_with(",50.00,25.00,300\n"));

        let content = fs::read_to_string(&tmp.0).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], LogRecord::header(true));
        assert_eq!(format!("{}\n", lines[1]), printed);
        assert_eq!(lines[1].split(',').count(), 4);
    }

    #[test]
    fn cycle_without_distance_sensor() {
        let tmp = TempLog::new("nodist-cycle");
        let aht = [aht_init(), aht_cycle()].concat();
        let mut acq = build(&aht, None, &tmp);

        let mut out: Vec<u8> = Vec::new();
        let record = acq.cycle(&mut out).unwrap();
        assert_eq!(record.distance_mm, None);

        let (mut aht_bus, tof_bus) = acq.release();
        aht_bus.done();
        assert!(tof_bus.is_none());
        assert!(String::from_utf8(out).unwrap().ends_with(",50.00,25.00\n"));
    }

    #[test]
    fn interrupt_completes_in_flight_cycle() {
        let tmp = TempLog::new("interrupt");
        let mut delay = NoopDelay::new();
        let aht10 = Aht10Builder::default()
            .build(I2cMock::new(&[aht_init(), aht_cycle()].concat()), &mut delay)
            .unwrap();
        let vl53l0x = Vl53l0xBuilder::default()
            .build(I2cMock::new(&[tof_init(), tof_cycle()].concat()), &mut delay)
            .unwrap();
        let datalog = Datalog::open(&tmp.0, true).unwrap();

        let running = AtomicBool::new(true);
        let calls = AtomicUsize::new(0);
        let delay = InterruptingDelay {
            running: &running,
            calls: &calls,
        };
        let acq = Acquisition::new(aht10, Some(vl53l0x), datalog, delay, 1000);

        let mut out: Vec<u8> = Vec::new();
        let (mut aht_bus, tof_bus) = acq.run(&running, &mut out).unwrap();
        aht_bus.done();
        tof_bus.expect("distance sensor enabled").done();

        assert!(!running.load(Ordering::Relaxed));
        assert!(calls.load(Ordering::Relaxed) >= 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
        let content = fs::read_to_string(&tmp.0).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn stopped_before_start_runs_no_cycle() {
        let tmp = TempLog::new("stopped");
        let acq = build(&aht_init(), Some(&tof_init()), &tmp);
        let running = AtomicBool::new(false);
        let mut out: Vec<u8> = Vec::new();
        let (mut aht_bus, tof_bus) = acq.run(&running, &mut out).unwrap();
        aht_bus.done();
        tof_bus.expect("distance sensor enabled").done();
        assert!(out.is_empty());
        let content = fs::read_to_string(&tmp.0).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn distance_bus_error_skips_write() {
        let tmp = TempLog::new("buserr");
        let aht = [aht_init(), aht_cycle()].concat();
        let mut tof = tof_init();
        tof.push(I2cTransaction::write(TOF, vec![0x14]).with_error(ErrorKind::NoAcknowledge(
            embedded_hal::i2c::NoAcknowledgeSource::Address,
        )));
        let mut acq = build(&aht, Some(&tof), &tmp);

        let mut out: Vec<u8> = Vec::new();
        match acq.cycle(&mut out) {
            Err(Error::Bus { sensor, .. }) => assert_eq!(sensor, "VL53L0X"),
            other => panic!("unexpected result: {other:?}"),
        }
        let (mut aht_bus, tof_bus) = acq.release();
        aht_bus.done();
        tof_bus.expect("distance sensor enabled").done();
        assert!(out.is_empty());
        let content = fs::read_to_string(&tmp.0).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
