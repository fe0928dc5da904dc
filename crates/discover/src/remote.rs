//! Remote device-list query
//!
//! One blocking TCP exchange per run: send the list request, read the reply
//! header, then stream the nested device and interface records straight into
//! the presenter. Records vary in count per device, so reads are strictly
//! sequential.

use crate::output::Presenter;
use common::{DiscoveryFailure, Error, NameDb};
use protocol::{
    DeviceRecord, DevlistReplyHeader, InterfaceRecord, OpCode, OpCommon, ProtocolError,
    USBIP_VERSION, version_string,
};
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::{debug, warn};

/// Query `host` for its exportable devices, rendering them as they arrive
pub fn list_exported_devices<W: Write>(
    host: &str,
    port: u16,
    names: &NameDb,
    presenter: &mut Presenter<W>,
) -> std::result::Result<usize, DiscoveryFailure> {
    let stream = TcpStream::connect((host, port)).map_err(|source| {
        DiscoveryFailure::before_output(Error::Connect {
            host: host.to_string(),
            port,
            source,
        })
    })?;
    debug!("connected to {host}:{port}");

    presenter
        .remote_host(host)
        .map_err(|e| DiscoveryFailure::before_output(Error::Io(e)))?;

    query_exported_devices(stream, names, presenter)
}

/// The device-list protocol exchange over an established transport
///
/// Generic over the transport so tests can drive it with a scripted peer.
pub fn query_exported_devices<S: Read + Write, W: Write>(
    mut stream: S,
    names: &NameDb,
    presenter: &mut Presenter<W>,
) -> std::result::Result<usize, DiscoveryFailure> {
    let mut emitted = 0;
    match run_query(&mut stream, names, presenter, &mut emitted) {
        Ok(()) => Ok(emitted),
        Err(error) => Err(DiscoveryFailure { emitted, error }),
    }
}

fn run_query<S: Read + Write, W: Write>(
    stream: &mut S,
    names: &NameDb,
    presenter: &mut Presenter<W>,
    emitted: &mut usize,
) -> common::Result<()> {
    OpCommon::request(OpCode::ReqDevlist)
        .write_to(stream)
        .map_err(write_error)?;

    let reply = OpCommon::read_from(stream).map_err(read_error)?;
    // Any reply header is accepted; anomalies are only worth a warning.
    if reply.code != OpCode::RepDevlist as u16 {
        warn!("unexpected reply code {:#06x}, continuing", reply.code);
    }
    if reply.status != 0 {
        warn!("peer reported status {:#06x}, continuing", reply.status);
    }
    if reply.version != USBIP_VERSION {
        debug!("peer protocol version {}", version_string(reply.version));
    }

    let header = DevlistReplyHeader::read_from(stream).map_err(read_error)?;
    debug!("exportable {} devices", header.device_count);

    for _ in 0..header.device_count {
        let device = DeviceRecord::read_from(stream).map_err(read_error)?;
        let product = names.product(device.vendor_id, device.product_id);
        let class = names.class(
            device.device_class,
            device.device_subclass,
            device.device_protocol,
        );
        presenter.remote_device(&device, &product, &class)?;
        *emitted += 1;

        for index in 0..device.num_interfaces {
            let interface = InterfaceRecord::read_from(stream).map_err(read_error)?;
            let class = names.class(
                interface.interface_class,
                interface.interface_subclass,
                interface.interface_protocol,
            );
            presenter.remote_interface(index as usize, &class)?;
        }
        presenter.end_device()?;
    }

    Ok(())
}

fn write_error(err: ProtocolError) -> Error {
    match err {
        ProtocolError::Io(io) => Error::TransportWrite(io),
        other => Error::Malformed(other),
    }
}

fn read_error(err: ProtocolError) -> Error {
    match err {
        ProtocolError::Io(io) => Error::TransportRead(io),
        other => Error::Malformed(other),
    }
}
